//! String-case helpers shared by naming and template rendering.
//!
//! These follow the Angular devkit conventions exactly, because the names
//! they produce end up in `angular.json`, `package.json` and `tsconfig.json`
//! next to names produced by the Angular CLI itself.
//!
//! | Helper       | `"innerHTML"`  | `"my-widget_x"` |
//! |--------------|----------------|-----------------|
//! | `decamelize` | `inner_html`   | `my-widget_x`   |
//! | `dasherize`  | `inner-html`   | `my-widget-x`   |
//! | `camelize`   | `innerHTML`    | `myWidgetX`     |
//! | `classify`   | `InnerHTML`    | `MyWidgetX`     |
//! | `underscore` | `inner_html`   | `my_widget_x`   |

/// Insert `_` at every lower/digit → upper boundary, then lowercase.
pub fn decamelize(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;

    for ch in input.chars() {
        if ch.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('_');
        }
        out.push(ch);
        prev = Some(ch);
    }

    out.to_lowercase()
}

/// Lowercase, dash-joined form used for folder and package names.
pub fn dasherize(input: &str) -> String {
    decamelize(input)
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}

/// `lowerCamelCase`: separators (`-`, `_`, `.`, whitespace) are dropped and
/// the following character is uppercased.
pub fn camelize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;

    for ch in input.chars() {
        if is_separator(ch) {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    lower_first(&out)
}

/// `UpperCamelCase`, applied per dot-separated part.
pub fn classify(input: &str) -> String {
    input
        .split('.')
        .map(|part| capitalize(&camelize(part)))
        .collect::<Vec<_>>()
        .join(".")
}

/// `snake_case`.
pub fn underscore(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    let mut in_space = false;

    for ch in input.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            prev = Some(ch);
            continue;
        }
        in_space = false;

        if ch == '-' {
            out.push('_');
        } else {
            if ch.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                out.push('_');
            }
            out.push(ch);
        }
        prev = Some(ch);
    }

    out.to_lowercase()
}

/// Uppercase the first character only.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Apply a helper by name. Returns `None` for unknown helpers.
pub fn apply(helper: &str, input: &str) -> Option<String> {
    let out = match helper {
        "decamelize" => decamelize(input),
        "dasherize" => dasherize(input),
        "camelize" => camelize(input),
        "classify" => classify(input),
        "underscore" => underscore(input),
        "capitalize" => capitalize(input),
        _ => return None,
    };
    Some(out)
}

/// Names accepted by [`apply`].
pub const HELPERS: [&str; 6] = [
    "decamelize",
    "dasherize",
    "camelize",
    "classify",
    "underscore",
    "capitalize",
];

fn is_separator(ch: char) -> bool {
    ch == '-' || ch == '_' || ch == '.' || ch.is_whitespace()
}

fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            first.to_ascii_lowercase().to_string() + chars.as_str()
        }
        Some(_) => input.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decamelize_inserts_underscores() {
        assert_eq!(decamelize("innerHTML"), "inner_html");
        assert_eq!(decamelize("action_name"), "action_name");
        assert_eq!(decamelize("css-class-name"), "css-class-name");
        assert_eq!(decamelize("my favorite items"), "my favorite items");
        assert_eq!(decamelize("a1B"), "a1_b");
    }

    #[test]
    fn dasherize_matches_devkit() {
        assert_eq!(dasherize("innerHTML"), "inner-html");
        assert_eq!(dasherize("action_name"), "action-name");
        assert_eq!(dasherize("css-class-name"), "css-class-name");
        assert_eq!(dasherize("my favorite items"), "my-favorite-items");
        assert_eq!(dasherize("MyWidgets"), "my-widgets");
        assert_eq!(dasherize("@acme/widgets"), "@acme/widgets");
    }

    #[test]
    fn camelize_matches_devkit() {
        assert_eq!(camelize("innerHTML"), "innerHTML");
        assert_eq!(camelize("action_name"), "actionName");
        assert_eq!(camelize("css-class-name"), "cssClassName");
        assert_eq!(camelize("my favorite items"), "myFavoriteItems");
        assert_eq!(camelize("My Favorite Items"), "myFavoriteItems");
        assert_eq!(camelize("trailing-"), "trailing");
    }

    #[test]
    fn classify_matches_devkit() {
        assert_eq!(classify("my-widgets"), "MyWidgets");
        assert_eq!(classify("action_name"), "ActionName");
        assert_eq!(classify("innerHTML"), "InnerHTML");
        assert_eq!(classify("a.b-c"), "A.BC");
    }

    #[test]
    fn underscore_matches_devkit() {
        assert_eq!(underscore("innerHTML"), "inner_html");
        assert_eq!(underscore("action_name"), "action_name");
        assert_eq!(underscore("css-class-name"), "css_class_name");
        assert_eq!(underscore("my favorite  items"), "my_favorite_items");
    }

    #[test]
    fn capitalize_first_char_only() {
        assert_eq!(capitalize("innerHTML"), "InnerHTML");
        assert_eq!(capitalize("action_name"), "Action_name");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn apply_rejects_unknown_helper() {
        assert_eq!(apply("dasherize", "FooBar").as_deref(), Some("foo-bar"));
        assert!(apply("shout", "x").is_none());
    }
}

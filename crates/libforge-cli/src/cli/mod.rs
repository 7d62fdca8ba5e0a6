//! CLI argument definitions using the clap derive API.
//!
//! Argument names, aliases, help text and value enums live here and nowhere
//! else. No generation logic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "libforge",
    bin_name = "libforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate Meteor-ready Angular libraries",
    long_about = "libforge adds a library project to an existing Angular workspace: \
                  it renders the library skeleton, registers the project in \
                  angular.json, pins the packaging dev dependencies and maps the \
                  import path in tsconfig.json.",
    after_help = "EXAMPLES:\n\
        \x20 libforge library my-lib\n\
        \x20 libforge library @acme/widgets --prefix acme --dry-run\n\
        \x20 libforge config set defaults.prefix acme\n\
        \x20 libforge completions bash > /usr/share/bash-completion/completions/libforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a library project in the current workspace.
    #[command(
        visible_alias = "lib",
        alias = "new",
        about = "Generate a library project",
        after_help = "EXAMPLES:\n\
            \x20 libforge library my-lib\n\
            \x20 libforge library @acme/widgets --prefix acme\n\
            \x20 libforge library my-lib --skip-install --workspace ../app\n\
            \x20 libforge library my-lib --force --dry-run"
    )]
    Library(LibraryArgs),

    /// Initialise a libforge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 libforge init           # platform config directory\n\
            \x20 libforge init --local   # .libforge.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 libforge completions bash > ~/.local/share/bash-completion/completions/libforge\n\
            \x20 libforge completions zsh  > ~/.zfunc/_libforge\n\
            \x20 libforge completions fish > ~/.config/fish/completions/libforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the libforge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 libforge config get defaults.prefix\n\
            \x20 libforge config set defaults.package_manager pnpm\n\
            \x20 libforge config list"
    )]
    Config(ConfigCommands),
}

// ── library ───────────────────────────────────────────────────────────────────

/// Arguments for `libforge library`.
#[derive(Debug, Args)]
pub struct LibraryArgs {
    /// Library identifier, optionally scoped (`@scope/name`).
    #[arg(value_name = "NAME", help = "Library name, e.g. my-lib or @acme/widgets")]
    pub name: String,

    /// Component selector prefix.
    #[arg(
        short = 'p',
        long = "prefix",
        value_name = "PREFIX",
        help = "Selector prefix [default: defaults.prefix from config, else 'lib']"
    )]
    pub prefix: Option<String>,

    #[arg(long = "skip-package-json", help = "Do not add dev dependencies to package.json")]
    pub skip_package_json: bool,

    #[arg(long = "skip-ts-config", help = "Do not add a path mapping to tsconfig.json")]
    pub skip_ts_config: bool,

    #[arg(long = "skip-install", help = "Do not run the package manager afterwards")]
    pub skip_install: bool,

    /// Overwrite files that already exist.
    #[arg(long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Keep files that already exist.
    #[arg(
        long = "skip-existing",
        conflicts_with = "force",
        help = "Keep existing files instead of failing"
    )]
    pub skip_existing: bool,

    /// Preview what would be written without touching the disk.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Workspace root (the directory holding angular.json).
    #[arg(
        short = 'w',
        long = "workspace",
        value_name = "DIR",
        help = "Workspace root [default: current directory]"
    )]
    pub workspace: Option<PathBuf>,

    /// Template directory overriding the built-in library skeleton.
    #[arg(
        long = "templates",
        value_name = "DIR",
        help = "Template directory [default: templates.local_path, $LIBFORGE_TEMPLATES_DIR or built-in]"
    )]
    pub templates: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and write immediately")]
    pub yes: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `libforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.libforge.toml` in the current directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `libforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `libforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.prefix`.
        key: String,
    },
    /// Set a configuration key in the configuration file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

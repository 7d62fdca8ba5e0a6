//! The full pipeline on a real directory with the production adapters.

use std::{fs, path::Path, sync::Arc};

use libforge_adapters::{
    AngularModuleGenerator, BuiltinTemplateSource, LocalFilesystem, MemoryFilesystem,
};
use libforge_core::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read_json(root: &Path, rel: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(root.join(rel)).unwrap()).unwrap()
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "angular.json",
        "{\n  \"version\": 1,\n  \"newProjectRoot\": \"projects\",\n  \"projects\": {}\n}\n",
    );
    write(
        temp.path(),
        "package.json",
        "{\n  \"name\": \"ws\",\n  \"devDependencies\": {\n    \"@angular/cli\": \"~6.1.0\"\n  }\n}\n",
    );
    write(
        temp.path(),
        "tsconfig.json",
        "{\n  \"compileOnSave\": false,\n  \"compilerOptions\": {\n    \"baseUrl\": \"./\"\n  }\n}\n",
    );
    temp
}

fn local_service() -> LibraryService {
    LibraryService::new(
        Arc::new(LocalFilesystem::new()),
        Box::new(BuiltinTemplateSource::new()),
        Box::new(AngularModuleGenerator::new()),
    )
}

#[test]
fn generates_a_complete_library() {
    let ws = workspace();
    let report = local_service()
        .generate(ws.path(), &LibraryOptions::new("@acme/widgets").prefix("acme"))
        .unwrap();

    let root = ws.path().join("projects/acme-widgets");
    for file in [
        "package.js",
        "package.json",
        "ng-package.json",
        "tsconfig.lib.json",
        "tsconfig.spec.json",
        "tslint.json",
        "karma.conf.js",
        "README.md",
        "src/test.ts",
        "client/src/public_api.ts",
        "client/src/lib/widgets.module.ts",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }

    // Rendered JSON stays valid JSON.
    for file in ["package.json", "ng-package.json", "tsconfig.lib.json", "tslint.json"] {
        read_json(&root, file);
    }
    assert_eq!(
        read_json(&root, "ng-package.json")["dest"],
        "../../dist/acme-widgets"
    );
    assert_eq!(
        read_json(&root, "tslint.json")["rules"]["directive-selector"][2],
        "acme"
    );

    let public_api = fs::read_to_string(root.join("client/src/public_api.ts")).unwrap();
    assert!(public_api.contains("export * from './lib/widgets.module';"));

    let meteor = fs::read_to_string(root.join("package.js")).unwrap();
    assert!(meteor.contains("name: 'acme:widgets'"));

    let workspace = read_json(ws.path(), "angular.json");
    let entry = &workspace["projects"]["@acme/widgets"];
    assert_eq!(entry["prefix"], "acme");
    assert_eq!(
        entry["architect"]["test"]["options"]["main"],
        "projects/acme-widgets/src/test.ts"
    );

    let tsconfig = read_json(ws.path(), "tsconfig.json");
    assert_eq!(tsconfig["compileOnSave"], false);
    assert_eq!(
        tsconfig["compilerOptions"]["paths"]["@acme/widgets"][0],
        "dist/acme-widgets"
    );

    assert_eq!(report.tasks, vec![Task::node_package_install()]);
    assert!(report.changes.iter().any(|c| c.verb() == "UPDATE"));
}

#[test]
fn failed_run_leaves_directory_untouched() {
    let ws = workspace();
    write(ws.path(), "projects/baz/README.md", "mine\n");
    let before = fs::read_to_string(ws.path().join("angular.json")).unwrap();

    let err = local_service()
        .generate(ws.path(), &LibraryOptions::new("baz"))
        .unwrap_err();

    assert!(err.to_string().contains("projects/baz/README.md"));
    assert_eq!(
        fs::read_to_string(ws.path().join("angular.json")).unwrap(),
        before
    );
    assert!(!ws.path().join("projects/baz/package.js").exists());
}

#[test]
fn dry_run_on_memory_filesystem_plans_every_file() {
    let fs = MemoryFilesystem::new();
    fs.insert("/ws/angular.json", "{\"projects\": {}}");
    let service = LibraryService::new(
        Arc::new(fs.clone()),
        Box::new(BuiltinTemplateSource::new()),
        Box::new(AngularModuleGenerator::new()),
    );
    let before = fs.snapshot();

    let report = service
        .plan(Path::new("/ws"), &LibraryOptions::new("baz").skip_install(true))
        .unwrap();

    assert!(!report.committed);
    assert!(report.tasks.is_empty());
    // 10 template files, the module and the workspace update.
    assert_eq!(report.changes.len(), 12);
    assert_eq!(fs.snapshot(), before);
}

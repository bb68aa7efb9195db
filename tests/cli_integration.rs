//! CLI integration tests for ccvars.
//!
//! Each test runs the binary against a throwaway source tree and home
//! directory so user configuration never leaks in.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the ccvars binary command, isolated from the caller's environment.
fn ccvars(home: &Path, source_root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ccvars").unwrap();
    cmd.env("HOME", home)
        .env_remove("CCVARS_SOURCE_ROOT")
        .env_remove("CCVARS_TARGET")
        .env_remove("CC_WRAPPER")
        .env_remove("LLVM_PREBUILTS_BASE")
        .env_remove("LLVM_PREBUILTS_VERSION")
        .env_remove("LLVM_RELEASE_VERSION")
        .arg("--no-color")
        .arg("--source-root")
        .arg(source_root);
    cmd
}

struct Workspace {
    home: TempDir,
    tree: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Workspace {
            home: TempDir::new().unwrap(),
            tree: TempDir::new().unwrap(),
        }
    }

    fn mkdir(&self, path: &str) {
        fs::create_dir_all(self.tree.path().join(path)).unwrap();
    }

    fn cmd(&self) -> Command {
        ccvars(self.home.path(), self.tree.path())
    }
}

// ============================================================================
// ccvars get
// ============================================================================

#[test]
fn test_get_include_paths_only_lists_existing_dirs() {
    let ws = Workspace::new();
    ws.mkdir("system/core/include");

    ws.cmd()
        .args(["get", "CommonGlobalIncludes"])
        .assert()
        .success()
        .stdout("-Isystem/core/include\n");
}

#[test]
fn test_get_undeclared_variable_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["get", "ClangBinn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no variable named `ClangBinn`"))
        .stderr(predicate::str::contains("Did you mean `ClangBin`?"));
}

#[test]
fn test_get_cc_wrapper_from_env() {
    let ws = Workspace::new();

    ws.cmd()
        .env("CC_WRAPPER", "ccache")
        .args(["get", "CcWrapper"])
        .assert()
        .success()
        .stdout("ccache \n");
}

#[test]
fn test_get_empty_cc_wrapper_is_unset() {
    let ws = Workspace::new();

    ws.cmd()
        .env("CC_WRAPPER", "")
        .args(["get", "CcWrapper"])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn test_get_clang_version_override() {
    let ws = Workspace::new();

    ws.cmd()
        .env("LLVM_PREBUILTS_VERSION", "clang-r365631")
        .args(["get", "ClangVersion"])
        .assert()
        .success()
        .stdout("clang-r365631\n");
}

#[test]
fn test_get_device_cflags_for_fuchsia() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["--target", "fuchsia", "get", "DeviceClangGlobalCflags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("${ClangExtraTargetCflags}").not());

    ws.cmd()
        .args(["get", "DeviceClangGlobalCflags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("${ClangExtraTargetCflags}"));
}

#[test]
fn test_get_target_from_env() {
    let ws = Workspace::new();

    ws.cmd()
        .env("CCVARS_TARGET", "fuchsia")
        .args(["get", "DeviceClangGlobalCflags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("${ClangExtraTargetCflags}").not());
}

#[test]
fn test_bad_target_rejected() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["--target", "plan9", "get", "ClangBase"])
        .assert()
        .failure();
}

// ============================================================================
// ccvars list
// ============================================================================

#[test]
fn test_list_prints_every_variable() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("# cc/config"))
        .stdout(predicate::str::contains("CcWrapper = \n"))
        .stdout(predicate::str::contains(
            "ClangTidyShellPath = build/soong/scripts/clang-tidy.sh",
        ));
}

#[test]
fn test_list_json() {
    let ws = Workspace::new();

    let output = ws.cmd().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert!(!entries.is_empty());

    let wrapper = entries
        .iter()
        .find(|e| e["name"] == "CcWrapper")
        .unwrap();
    assert_eq!(wrapper["kind"], "lazy");
    assert_eq!(wrapper["value"], "");
}

#[test]
fn test_project_config_extends_unsupported_flags() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["get", "CommonClangGlobalCflags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-Wno-multichar"));

    ws.mkdir(".ccvars");
    fs::write(
        ws.tree.path().join(".ccvars/config.toml"),
        r#"
[unsupported."clang-r353983c"]
cflags = ["-Wno-multichar"]
"#,
    )
    .unwrap();

    ws.cmd()
        .args(["get", "CommonClangGlobalCflags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-Wno-multichar").not())
        .stdout(predicate::str::contains("${ClangExtraCflags}"));
}

// ============================================================================
// ccvars refs
// ============================================================================

#[test]
fn test_refs_lists_external_references() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("refs")
        .assert()
        .success()
        .stdout(predicate::str::contains("-> ${ClangExtraCflags}"));
}

use std::path::{Path, PathBuf};

fn workspace_version_file() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir");
    Path::new(&manifest_dir)
        .ancestors()
        .nth(2)
        .expect("crate lives two levels below the workspace root")
        .join("VERSION")
}

fn main() {
    let version_file = workspace_version_file();
    println!("cargo:rerun-if-changed={}", version_file.display());

    let contents = std::fs::read_to_string(&version_file).expect("read VERSION file");
    let version = contents.trim();
    assert!(
        !version.is_empty() && !version.contains(char::is_whitespace),
        "VERSION must hold a single non-empty token"
    );

    println!("cargo:rustc-env=JOB_SENTRY_VERSION={version}");
}

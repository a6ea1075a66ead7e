//! Build script for fanout-http
//!
//! Stamps the CLI version string with the git revision it was built from.

use std::process::Command;

fn main() {
    let revision = git_revision().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_HASH={}", revision);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
    println!("cargo:rerun-if-env-changed=DOCS_RS");
}

/// Short revision of HEAD, with a `-dirty` suffix for uncommitted changes
fn git_revision() -> Option<String> {
    // docs.rs builds from a crate tarball
    if std::env::var_os("DOCS_RS").is_some() {
        return Some("docs-rs-build".to_string());
    }

    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;

    String::from_utf8(output.stdout)
        .ok()
        .map(|revision| revision.trim().to_string())
        .filter(|revision| !revision.is_empty())
}

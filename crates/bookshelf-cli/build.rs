//! Sets `BOOKSHELF_VERSION` for `bookshelf --version`.
//!
//! Release builds from a tagged checkout report the tag, development builds
//! report the commit with a `-dirty` suffix when the tree has local changes.
//! Without git the crate version is used.

use std::process::Command;

fn main() {
    for path in ["../../.git/HEAD", "../../.git/refs/tags"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let version = describe().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned());
    println!("cargo:rustc-env=BOOKSHELF_VERSION={version}");
}

fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())?;

    let described = String::from_utf8(output.stdout).ok()?;
    match described.trim() {
        "" => None,
        tag => Some(tag.trim_start_matches('v').to_owned()),
    }
}

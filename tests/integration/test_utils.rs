//! Shared fixtures for integration tests

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Populate `root` with a small nested directory of text files and return
/// their names in walk order
pub fn populate(root: &Path) -> Vec<String> {
    fs::create_dir_all(root.join("docs/drafts")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();

    let files = [
        ("README.md", "# project"),
        ("docs/drafts/plan.txt", "step one"),
        ("docs/guide.md", "read me first"),
        ("docs.txt", "flat file next to the docs dir"),
        ("src/lib.rs", "pub fn answer() -> u32 { 42 }"),
        ("src/main.rs", "fn main() {}"),
        ("zzz.bin", "\u{0}\u{1}\u{2}"),
    ];
    for (name, content) in files {
        fs::write(root.join(name), content).unwrap();
    }

    vec![
        "README.md".to_string(),
        "docs/drafts/plan.txt".to_string(),
        "docs/guide.md".to_string(),
        "docs.txt".to_string(),
        "src/lib.rs".to_string(),
        "src/main.rs".to_string(),
        "zzz.bin".to_string(),
    ]
}

/// Temp directory with `count` flat files named `file000` onwards
pub fn flat_dir(count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..count {
        fs::write(
            dir.path().join(format!("file{:03}", i)),
            format!("contents of file number {}", i),
        )
        .unwrap();
    }
    dir
}

/// Block on an async operation with a fresh multi-thread runtime
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

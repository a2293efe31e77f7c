//! Integration tests for command parsing and end-to-end command runs

use super::test_utils::populate;
use clap::Parser;
use merkdir::cli::{map_error, Cli, CommandOutput, Commands, RunContext};
use merkdir::config::MerkdirConfig;
use merkdir::error::ApiError;
use std::fs;
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<CommandOutput, ApiError> {
    let cli = Cli::try_parse_from(args).unwrap();
    RunContext::with_config(MerkdirConfig::default())
        .with_color(false)
        .execute(&cli.command)
}

fn text(output: CommandOutput) -> String {
    match output {
        CommandOutput::Text(text) => text,
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_parse_short_flags() {
    let cli = Cli::try_parse_from(["merkdir", "inclusion", "-t", "tree.bin", "-f", "a/b.txt"]).unwrap();
    match cli.command {
        Commands::Inclusion { tree, file, output } => {
            assert_eq!(tree.to_str(), Some("tree.bin"));
            assert_eq!(file, "a/b.txt");
            assert!(output.is_none());
        }
        other => panic!("unexpected command {:?}", other),
    }

    let cli = Cli::try_parse_from([
        "merkdir",
        "verify-inclusion",
        "-p",
        "x.proof",
        "-f",
        "x",
        "--hash",
        "abcd",
        "--verbose",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert!(matches!(
        cli.command,
        Commands::VerifyInclusion { hash: Some(_), hex: false, .. }
    ));
}

#[test]
fn test_gen_requires_output() {
    assert!(Cli::try_parse_from(["merkdir", "gen", "somedir"]).is_err());
}

#[test]
fn test_version() {
    let out = text(run(&["merkdir", "version"]).unwrap());
    assert!(out.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_full_workflow() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    populate(&src);
    let tree = dir.path().join("tree.merkdir");
    let proof = dir.path().join("plan.proof");
    let src_str = src.to_str().unwrap();
    let tree_str = tree.to_str().unwrap();
    let proof_str = proof.to_str().unwrap();

    let gen = text(run(&["merkdir", "gen", src_str, "-o", tree_str]).unwrap());
    let root_hex = gen.strip_prefix("Root hash: ").unwrap().to_string();
    assert_eq!(root_hex.len(), 64);

    let root = text(run(&["merkdir", "root", tree_str, "--hex"]).unwrap());
    assert_eq!(root, root_hex);

    let explanation = text(
        run(&["merkdir", "inclusion", "-t", tree_str, "-f", "docs/drafts/plan.txt"]).unwrap(),
    );
    assert!(explanation.contains("corresponds to leaf index 1"));
    assert!(explanation.contains(&root_hex));

    let written = run(&[
        "merkdir",
        "inclusion",
        "-t",
        tree_str,
        "-f",
        "docs/drafts/plan.txt",
        "-o",
        proof_str,
    ])
    .unwrap();
    assert_eq!(written, CommandOutput::Empty);

    let file = src.join("docs/drafts/plan.txt");
    let file_str = file.to_str().unwrap();
    let candidate = text(
        run(&["merkdir", "verify-inclusion", "-p", proof_str, "-f", file_str, "--hex"]).unwrap(),
    );
    assert_eq!(candidate, root_hex);

    let verdict = text(
        run(&[
            "merkdir",
            "verify-inclusion",
            "-p",
            proof_str,
            "-f",
            file_str,
            "--hash",
            &root_hex,
        ])
        .unwrap(),
    );
    assert_eq!(verdict, "OK: proof and file match given root hash");

    let info = text(run(&["merkdir", "info", tree_str]).unwrap());
    assert!(info.contains("Num. of files"));
    assert!(info.contains(&root_hex));

    let proof_info = text(run(&["merkdir", "info", tree_str, "-p", proof_str]).unwrap());
    assert!(proof_info.contains("docs/drafts/plan.txt"));
}

#[test]
fn test_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    let garbage = dir.path().join("garbage");
    fs::write(&garbage, "definitely not a tree").unwrap();

    let err = run(&["merkdir", "root", garbage.to_str().unwrap()]).unwrap_err();
    assert!(map_error(&err).starts_with("error reading or decoding file"));

    let missing = dir.path().join("missing");
    let err = run(&["merkdir", "root", missing.to_str().unwrap()]).unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}

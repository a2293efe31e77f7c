//! Integration tests for directory Merkle trees and inclusion proofs

mod cli_commands;
mod ingest_pipeline;
mod test_utils;

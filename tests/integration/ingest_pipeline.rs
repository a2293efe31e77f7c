//! Integration tests for the concurrent leaf ingestion pipeline

use super::test_utils::flat_dir;
use merkdir::error::ApiError;
use merkdir::ingest::{IngestConfig, Ingestor};
use merkdir::tree::walker::{FileEntry, Walker};

fn entries(dir: &tempfile::TempDir) -> Vec<FileEntry> {
    Walker::new(dir.path().to_path_buf()).walk().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_leaf_order_independent_of_pool_shape() {
    let dir = flat_dir(64);
    let expected: Vec<String> = entries(&dir).into_iter().map(|e| e.name).collect();

    for (workers, queue_depth) in [(1, 1), (3, 2), (16, 4), (64, 256)] {
        let config = IngestConfig {
            workers: Some(workers),
            queue_depth,
            ..IngestConfig::default()
        };
        let (leaves, stats) = Ingestor::new(config).ingest(entries(&dir)).await.unwrap();
        let names: Vec<&str> = leaves.iter().filter_map(|l| l.name()).collect();
        assert_eq!(names, expected, "workers={} queue_depth={}", workers, queue_depth);
        assert_eq!(stats.files, 64);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stats_count_bytes() {
    let dir = flat_dir(10);
    let files = entries(&dir);
    let total: u64 = files.iter().map(|e| e.size).sum();

    let (_, stats) = Ingestor::new(IngestConfig::default())
        .ingest(files)
        .await
        .unwrap();
    assert_eq!(stats.bytes, total);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_vanished_file_fails_ingestion() {
    let dir = flat_dir(20);
    let files = entries(&dir);
    std::fs::remove_file(dir.path().join("file013")).unwrap();

    let config = IngestConfig {
        workers: Some(4),
        queue_depth: 2,
        ..IngestConfig::default()
    };
    let err = Ingestor::new(config).ingest(files).await.unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_every_leaf_has_its_own_nonce() {
    let dir = flat_dir(8);
    let (leaves, _) = Ingestor::new(IngestConfig::default())
        .ingest(entries(&dir))
        .await
        .unwrap();
    let mut nonces: Vec<[u8; 16]> = leaves.iter().filter_map(|l| l.nonce().copied()).collect();
    nonces.sort();
    nonces.dedup();
    assert_eq!(nonces.len(), 8);
}

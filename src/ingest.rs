//! Leaf Ingestion
//!
//! Hashes the files of a directory concurrently and hands the resulting leaves
//! to the tree builder in walk order.
//!
//! A feeder task fills a bounded work queue with `(index, file)` pairs. A fixed
//! set of workers pull from the queue and hash each file on the blocking pool.
//! The coordinator collects `(index, result)` pairs into an indexed slot table,
//! so arrival order never affects leaf order. The first failure aborts every
//! task and is returned; partial results are discarded.

use crate::error::ApiError;
use crate::store::TreeFile;
use crate::tree::builder::build_tree;
use crate::tree::hasher::create_leaf;
use crate::tree::node::Node;
use crate::tree::path;
use crate::tree::walker::{FileEntry, WalkConfig, Walker};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, trace};

/// Ingestion pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Fixed worker count; derived from available parallelism when unset
    #[serde(default)]
    pub workers: Option<usize>,

    /// Workers per available CPU when `workers` is unset. Hashing is mostly
    /// waiting on disk, so the pool is oversubscribed.
    #[serde(default = "default_oversubscription")]
    pub oversubscription: usize,

    /// Capacity of the bounded work queue
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

fn default_oversubscription() -> usize {
    2
}

fn default_queue_depth() -> usize {
    256
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: None,
            oversubscription: default_oversubscription(),
            queue_depth: default_queue_depth(),
        }
    }
}

impl IngestConfig {
    /// Validate ingestion settings
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == Some(0) {
            return Err("Worker count must be at least 1".to_string());
        }
        if self.oversubscription == 0 {
            return Err("Oversubscription factor must be at least 1".to_string());
        }
        if self.queue_depth == 0 {
            return Err("Queue depth must be at least 1".to_string());
        }
        Ok(())
    }

    /// Number of workers to start
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(workers) => workers.max(1),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                (cpus * self.oversubscription).max(1)
            }
        }
    }
}

/// Totals for a completed ingestion
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub files: u64,
    pub bytes: u64,
}

type WorkItem = (usize, FileEntry);
type WorkResult = (usize, Result<Node, ApiError>);

/// Concurrent leaf creation for a list of files
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Hash every entry into a leaf, returning leaves in the order of `entries`
    #[instrument(skip(self, entries), fields(file_count = entries.len()))]
    pub async fn ingest(&self, entries: Vec<FileEntry>) -> Result<(Vec<Node>, IngestStats), ApiError> {
        let start = Instant::now();
        let total = entries.len();
        let worker_count = self.config.worker_count().min(total.max(1));
        info!(worker_count, "Starting leaf ingestion");

        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(self.config.queue_depth.max(1));
        let (result_tx, mut result_rx) = mpsc::channel::<WorkResult>(worker_count * 2);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let bytes = Arc::new(AtomicU64::new(0));

        let mut tasks = JoinSet::new();

        tasks.spawn(async move {
            for item in entries.into_iter().enumerate() {
                if work_tx.send(item).await.is_err() {
                    // Workers are gone; the coordinator is already aborting
                    break;
                }
            }
        });

        for worker_id in 0..worker_count {
            let work_rx = Arc::clone(&work_rx);
            let result_tx = result_tx.clone();
            let bytes = Arc::clone(&bytes);
            tasks.spawn(async move {
                Self::worker_loop(worker_id, work_rx, result_tx, bytes).await;
            });
        }
        // Only workers hold senders now, so the channel closes when they finish
        drop(result_tx);

        let mut slots: Vec<Option<Node>> = std::iter::repeat_with(|| None).take(total).collect();
        let mut received = 0usize;

        while let Some((index, result)) = result_rx.recv().await {
            match result {
                Ok(leaf) => {
                    slots[index] = Some(leaf);
                    received += 1;
                }
                Err(e) => {
                    error!(index, error = %e, "Leaf creation failed, aborting ingestion");
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| ApiError::Ingest(format!("Worker task failed: {}", e)))?;
        }

        if received != total {
            return Err(ApiError::Ingest(format!(
                "Expected {} leaves but received {}",
                total, received
            )));
        }
        let leaves: Vec<Node> = slots.into_iter().flatten().collect();

        let stats = IngestStats {
            files: leaves.len() as u64,
            bytes: bytes.load(Ordering::Relaxed),
        };
        info!(
            files = stats.files,
            bytes = stats.bytes,
            duration_ms = start.elapsed().as_millis(),
            "Leaf ingestion completed"
        );
        Ok((leaves, stats))
    }

    /// Pull files from the shared queue until it is drained
    async fn worker_loop(
        worker_id: usize,
        work_rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
        result_tx: mpsc::Sender<WorkResult>,
        bytes: Arc<AtomicU64>,
    ) {
        debug!(worker_id, "Worker started");
        loop {
            let item = {
                let mut rx = work_rx.lock().await;
                rx.recv().await
            };
            let Some((index, entry)) = item else {
                break;
            };

            let size = entry.size;
            let result = tokio::task::spawn_blocking(move || hash_entry(entry))
                .await
                .unwrap_or_else(|e| Err(ApiError::Ingest(format!("Hashing task failed: {}", e))));
            if result.is_ok() {
                bytes.fetch_add(size, Ordering::Relaxed);
            }

            let failed = result.is_err();
            if result_tx.send((index, result)).await.is_err() || failed {
                break;
            }
        }
        debug!(worker_id, "Worker finished");
    }
}

/// Open and stream-hash one file into a leaf with a fresh nonce
fn hash_entry(entry: FileEntry) -> Result<Node, ApiError> {
    trace!(name = %entry.name, size = entry.size, "Hashing file");
    let file = File::open(&entry.path)?;
    let leaf = create_leaf(entry.name, BufReader::new(file), None)?;
    Ok(leaf)
}

/// Walk a directory, hash its files, and build the tree file for it
///
/// The `files` map records each name's position in walk order, which is also
/// its leaf index.
#[instrument(skip_all, fields(root = %root.display()))]
pub async fn generate_tree(
    root: &Path,
    walk: &WalkConfig,
    ingest: &IngestConfig,
) -> Result<TreeFile, ApiError> {
    let created_at = Utc::now();
    let absolute = path::absolute_root(root)?;
    if !absolute.is_dir() {
        return Err(ApiError::InvalidPath(absolute));
    }

    let entries = Walker::with_config(absolute.clone(), walk.clone()).walk()?;
    let files: BTreeMap<String, u64> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (entry.name.clone(), index as u64))
        .collect();
    if files.len() != entries.len() {
        return Err(ApiError::Ingest(format!(
            "{} files map to {} distinct names",
            entries.len(),
            files.len()
        )));
    }
    info!(file_count = entries.len(), "Found files, starting hashing");

    let (leaves, _stats) = Ingestor::new(ingest.clone()).ingest(entries).await?;
    let root_node = build_tree(leaves);

    Ok(TreeFile {
        path: absolute,
        files,
        created_at,
        root: root_node,
    })
}

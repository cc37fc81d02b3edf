//! Replace-all loader
//!
//! Clears the target collection, inserts documents in fixed-size batches in
//! input order, then creates the collection indexes. The first failed batch
//! stops the load; indexes are only created after every batch succeeded.

use medseed_common::Result;
use std::time::Instant;
use tracing::{info, instrument};

use crate::config::DEFAULT_BATCH_SIZE;
use crate::models::MedicineDocument;
use crate::progress::{create_insert_progress, hidden_progress};
use crate::store::{medicine_indexes, MedicineStore};

#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    pub batch_size: usize,
    pub show_progress: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: true,
        }
    }
}

/// What a load did to the collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub cleared: u64,
    pub inserted: usize,
    pub batches: usize,
    pub indexes: Vec<String>,
}

pub struct ReplaceAllLoader<'a> {
    store: &'a dyn MedicineStore,
    config: LoaderConfig,
}

impl<'a> ReplaceAllLoader<'a> {
    pub fn new(store: &'a dyn MedicineStore, config: LoaderConfig) -> Self {
        // A zero batch size is rejected during config validation.
        let config = LoaderConfig {
            batch_size: config.batch_size.max(1),
            ..config
        };
        Self { store, config }
    }

    /// Number of insert calls needed for `count` documents
    pub fn batch_count(&self, count: usize) -> usize {
        count.div_ceil(self.config.batch_size)
    }

    /// Replace the collection contents with `documents`.
    ///
    /// An empty slice leaves the collection untouched.
    #[instrument(skip_all, fields(documents = documents.len(), batch_size = self.config.batch_size))]
    pub async fn load(&self, documents: &[MedicineDocument]) -> Result<LoadReport> {
        if documents.is_empty() {
            info!("No documents to load, leaving collection untouched");
            return Ok(LoadReport::default());
        }

        let start = Instant::now();
        let cleared = self.store.clear_all().await?;
        info!(cleared, "Cleared existing medicines");

        let total_batches = self.batch_count(documents.len());
        let pb = if self.config.show_progress {
            create_insert_progress(documents.len() as u64, "Inserting medicines")
        } else {
            hidden_progress(documents.len() as u64)
        };

        let mut inserted = 0;
        for (batch_idx, batch) in documents.chunks(self.config.batch_size).enumerate() {
            let count = match self.store.insert_batch(batch).await {
                Ok(count) => count,
                Err(e) => {
                    pb.abandon_with_message(format!(
                        "Failed at batch {}/{}",
                        batch_idx + 1,
                        total_batches
                    ));
                    return Err(e);
                },
            };
            inserted += count;
            pb.inc(batch.len() as u64);
            info!("Inserted batch {}/{}", batch_idx + 1, total_batches);
        }
        pb.finish_and_clear();

        let indexes = self.store.ensure_indexes(&medicine_indexes()).await?;
        info!(indexes = ?indexes, "Created indexes");

        info!(
            inserted,
            batches = total_batches,
            duration_ms = start.elapsed().as_millis() as u64,
            "Load complete"
        );

        Ok(LoadReport {
            cleared,
            inserted,
            batches: total_batches,
            indexes,
        })
    }
}

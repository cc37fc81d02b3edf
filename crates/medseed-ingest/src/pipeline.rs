//! Seeding pipeline
//!
//! Runs the stages of one seeding run in order:
//!
//! 1. Read the CSV file
//! 2. Transform rows into documents
//! 3. Connect to MongoDB (skipped for dry runs and empty input)
//! 4. Replace the collection contents and create indexes
//!
//! The input is read completely before connecting, so a missing or
//! unreadable file never touches the database.

use chrono::Utc;
use medseed_common::{Result, SeedError};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::config::SeedConfig;
use crate::loader::{LoadReport, LoaderConfig, ReplaceAllLoader};
use crate::source::read_csv_file;
use crate::store::{MedicineStore, MongoMedicineStore};
use crate::transform::{MedicineTransformer, TransformOutcome};

/// Rejections logged individually before summarizing
const REJECTION_SAMPLE: usize = 5;

/// Summary of a finished run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows_read: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub dry_run: bool,
    /// `None` when the database was not touched
    pub load: Option<LoadReport>,
}

/// Execute a full seeding run.
pub async fn run(config: &SeedConfig) -> Result<RunSummary> {
    let start = Instant::now();
    let outcome = prepare(config)?;

    let mut summary = RunSummary {
        rows_read: outcome.total(),
        accepted: outcome.accepted.len(),
        rejected: outcome.rejected.len(),
        dry_run: config.dry_run,
        load: None,
    };

    if config.dry_run {
        info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            "Dry run complete, database not modified"
        );
        return Ok(summary);
    }

    if outcome.accepted.is_empty() {
        warn!("No valid medicine records found, database not modified");
        return Ok(summary);
    }

    let settings = config
        .mongo
        .as_ref()
        .ok_or_else(|| SeedError::config("MONGODB_URI is not set"))?;
    let store = MongoMedicineStore::connect(settings).await?;

    summary.load = Some(load_and_close(&store, config, &outcome).await?);

    info!(
        inserted = summary.accepted,
        skipped = summary.rejected,
        duration_ms = start.elapsed().as_millis() as u64,
        "Successfully seeded medicines"
    );
    Ok(summary)
}

/// Read and transform the input file.
#[instrument(skip_all, fields(csv = %config.csv_path.display()))]
pub fn prepare(config: &SeedConfig) -> Result<TransformOutcome> {
    let rows = read_csv_file(&config.csv_path, config.limit)?;
    info!(rows = rows.len(), columns = rows.headers.len(), "Read CSV");

    let transformer = MedicineTransformer::new(Utc::now());
    let outcome = transformer.transform_all(&rows.rows);
    log_rejections(&outcome);

    info!(
        accepted = outcome.accepted.len(),
        rejected = outcome.rejected.len(),
        "Transformed records"
    );
    Ok(outcome)
}

/// Load prepared documents through `store`, then close it whatever the outcome.
pub async fn load_and_close(
    store: &dyn MedicineStore,
    config: &SeedConfig,
    outcome: &TransformOutcome,
) -> Result<LoadReport> {
    let result = load_into(store, config, outcome).await;
    store.close().await;
    result
}

/// Load prepared documents through `store`. Does not close the store.
#[instrument(skip_all, fields(documents = outcome.accepted.len()))]
pub async fn load_into(
    store: &dyn MedicineStore,
    config: &SeedConfig,
    outcome: &TransformOutcome,
) -> Result<LoadReport> {
    let loader = ReplaceAllLoader::new(
        store,
        LoaderConfig {
            batch_size: config.batch_size,
            show_progress: config.show_progress,
        },
    );
    loader.load(&outcome.accepted).await
}

fn log_rejections(outcome: &TransformOutcome) {
    if outcome.rejected.is_empty() {
        return;
    }

    for rejection in outcome.rejected.iter().take(REJECTION_SAMPLE) {
        warn!(line = rejection.line, reason = %rejection.reason, "Skipped record");
    }
    if outcome.rejected.len() > REJECTION_SAMPLE {
        info!(
            hidden = outcome.rejected.len() - REJECTION_SAMPLE,
            "Further skipped records are logged at debug level"
        );
    }

    info!(
        skipped = outcome.rejected.len(),
        missing_name = outcome.missing_names(),
        malformed = outcome.malformed_rows(),
        "Skipped records by reason"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::MedicineDocument;
    use crate::store::IndexSpec;
    use async_trait::async_trait;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        names: Arc<Mutex<Vec<String>>>,
        cleared: Arc<Mutex<bool>>,
        events: Arc<Mutex<Vec<&'static str>>>,
        fail_inserts: bool,
    }

    #[async_trait]
    impl MedicineStore for RecordingStore {
        async fn clear_all(&self) -> Result<u64> {
            *self.cleared.lock().await = true;
            self.events.lock().await.push("clear");
            Ok(0)
        }

        async fn insert_batch(&self, documents: &[MedicineDocument]) -> Result<usize> {
            self.events.lock().await.push("insert");
            if self.fail_inserts {
                return Err(SeedError::database("insert", "write concern timeout"));
            }
            self.names
                .lock()
                .await
                .extend(documents.iter().map(|d| d.name.clone()));
            Ok(documents.len())
        }

        async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> Result<Vec<String>> {
            self.events.lock().await.push("index");
            Ok(indexes.iter().map(|i| i.name.clone()).collect())
        }

        async fn close(&self) {
            self.events.lock().await.push("close");
        }
    }

    fn config(csv_path: PathBuf) -> SeedConfig {
        SeedConfig {
            mongo: None,
            csv_path,
            batch_size: 2,
            limit: None,
            dry_run: true,
            show_progress: false,
        }
    }

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_prepare_transforms_file() {
        let file = write_csv(
            "name,price,side_effects\n\
             Crocin Advance,20,\"Nausea, Rash\"\n\
             ,15,\n\
             Combiflam,42.1,\n",
        );

        let outcome = prepare(&config(file.path().to_path_buf())).unwrap();

        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.accepted[0].side_effects, vec!["Nausea", "Rash"]);
        assert_eq!(outcome.accepted[1].price, 42.1);
    }

    #[test]
    fn test_prepare_respects_limit() {
        let file = write_csv("name\nA\nB\nC\n");
        let mut config = config(file.path().to_path_buf());
        config.limit = Some(2);

        assert_eq!(prepare(&config).unwrap().total(), 2);
    }

    #[test]
    fn test_prepare_missing_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare(&config(dir.path().join("missing.csv"))).unwrap_err();

        assert_eq!(err.exit_status().code(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_reports_counts() {
        let file = write_csv("name\nPan 40\nDolo 650\n");

        let summary = run(&config(file.path().to_path_buf())).await.unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.accepted, 2);
        assert!(summary.load.is_none());
    }

    #[tokio::test]
    async fn test_no_valid_records_skips_database() {
        let file = write_csv("name,price\n,10\nNA,20\n");
        let mut config = config(file.path().to_path_buf());
        config.dry_run = false;

        // No connection settings: reaching the connect stage would fail.
        let summary = run(&config).await.unwrap();

        assert_eq!(summary.accepted, 0);
        assert_eq!(summary.rejected, 2);
        assert!(summary.load.is_none());
    }

    #[tokio::test]
    async fn test_load_into_store() {
        let file = write_csv("name\nA\nB\nC\n");
        let config = config(file.path().to_path_buf());
        let outcome = prepare(&config).unwrap();
        let store = RecordingStore::default();

        let report = load_into(&store, &config, &outcome).await.unwrap();

        assert!(*store.cleared.lock().await);
        assert_eq!(report.batches, 2);
        assert_eq!(*store.names.lock().await, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_store_closed_after_successful_load() {
        let file = write_csv("name\nA\nB\nC\n");
        let config = config(file.path().to_path_buf());
        let outcome = prepare(&config).unwrap();
        let store = RecordingStore::default();

        load_and_close(&store, &config, &outcome).await.unwrap();

        assert_eq!(
            *store.events.lock().await,
            vec!["clear", "insert", "insert", "index", "close"]
        );
    }

    #[tokio::test]
    async fn test_store_closed_after_failed_insert() {
        let file = write_csv("name\nA\nB\nC\n");
        let config = config(file.path().to_path_buf());
        let outcome = prepare(&config).unwrap();
        let store = RecordingStore {
            fail_inserts: true,
            ..RecordingStore::default()
        };

        let err = load_and_close(&store, &config, &outcome).await.unwrap_err();

        assert_eq!(err.exit_status().code(), 3);
        assert_eq!(*store.events.lock().await, vec!["clear", "insert", "close"]);
        assert!(store.names.lock().await.is_empty());
    }
}

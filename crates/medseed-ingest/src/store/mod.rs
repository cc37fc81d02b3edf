//! Medicine collection storage
//!
//! [`MedicineStore`] abstracts the target collection so the loader can be
//! exercised without a running database. [`MongoMedicineStore`] is the
//! production implementation.

mod indexes;
mod mongo;

pub use indexes::{medicine_indexes, IndexKind, IndexSpec, TEXT_INDEX_NAME};
pub use mongo::MongoMedicineStore;

use async_trait::async_trait;
use medseed_common::Result;

use crate::models::MedicineDocument;

/// Operations the replace-all load needs from the target collection.
///
/// Implementations report failures as [`medseed_common::SeedError::Database`]
/// so they map to the database exit status.
#[async_trait]
pub trait MedicineStore: Send + Sync {
    /// Delete every document in the collection.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of documents removed
    async fn clear_all(&self) -> Result<u64>;

    /// Insert one batch of documents. Order within the batch is kept.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of documents the server acknowledged
    async fn insert_batch(&self, documents: &[MedicineDocument]) -> Result<usize>;

    /// Create the given indexes. Existing identical indexes are not an error.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Names of the indexes as reported by the server
    async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> Result<Vec<String>>;

    /// Release the connection. Called once, on every exit path after connecting.
    async fn close(&self);
}

use async_trait::async_trait;
use bson::doc;
use medseed_common::{Result, SeedError};
use mongodb::options::{ClientOptions, IndexOptions, Tls, TlsOptions};
use mongodb::{Client, Collection, IndexModel};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{IndexSpec, MedicineStore};
use crate::config::MongoSettings;
use crate::models::MedicineDocument;

const APP_NAME: &str = "medseed";
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// [`MedicineStore`] backed by a MongoDB collection
pub struct MongoMedicineStore {
    client: Client,
    collection: Collection<MedicineDocument>,
}

impl MongoMedicineStore {
    /// Connect and verify the deployment answers a `ping`.
    ///
    /// TLS is always enabled. Certificate validation is only relaxed when the
    /// settings ask for it explicitly.
    #[instrument(skip_all, fields(database = %settings.database, collection = %settings.collection))]
    pub async fn connect(settings: &MongoSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(|e| SeedError::database("connect", e))?;

        options.app_name = Some(APP_NAME.to_string());
        options
            .server_selection_timeout
            .get_or_insert(SERVER_SELECTION_TIMEOUT);

        let mut tls = match options.tls.take() {
            Some(Tls::Enabled(tls)) => tls,
            _ => TlsOptions::default(),
        };
        if settings.tls_allow_invalid_certificates {
            warn!("TLS certificate validation is disabled for this connection");
            tls.allow_invalid_certificates = Some(true);
        }
        options.tls = Some(Tls::Enabled(tls));

        let client =
            Client::with_options(options).map_err(|e| SeedError::database("connect", e))?;
        let database = client.database(&settings.database);

        if let Err(e) = database.run_command(doc! { "ping": 1 }, None).await {
            client.shutdown().await;
            return Err(SeedError::database("connect", e));
        }

        info!("Connected to MongoDB");
        Ok(Self {
            collection: database.collection(&settings.collection),
            client,
        })
    }
}

#[async_trait]
impl MedicineStore for MongoMedicineStore {
    async fn clear_all(&self) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! {}, None)
            .await
            .map_err(|e| SeedError::database("clear", e))?;
        Ok(result.deleted_count)
    }

    async fn insert_batch(&self, documents: &[MedicineDocument]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .insert_many(documents, None)
            .await
            .map_err(|e| SeedError::database("insert", e))?;
        Ok(result.inserted_ids.len())
    }

    async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> Result<Vec<String>> {
        let models: Vec<IndexModel> = indexes
            .iter()
            .map(|spec| {
                IndexModel::builder()
                    .keys(spec.keys_document())
                    .options(IndexOptions::builder().name(spec.name.clone()).build())
                    .build()
            })
            .collect();

        let result = self
            .collection
            .create_indexes(models, None)
            .await
            .map_err(|e| SeedError::database("index", e))?;
        Ok(result.index_names)
    }

    async fn close(&self) {
        debug!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}

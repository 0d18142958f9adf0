//! MongoDB-backed [`DocumentStore`].
//!
//! One [`Client`] is opened at startup and cloned into every request; the
//! driver pools connections internally. Documents are converted to relaxed
//! extended JSON on the way out so nothing above this module sees BSON.

use std::time::Duration;

use async_trait::async_trait;
use capjobs_core::RawDocument;
use futures::StreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use tracing::{debug, error, info};

use crate::{DocumentStore, DocumentStream, StoreError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Open the client and ping the deployment.
    ///
    /// Only an unparseable connection string is an error. A failed ping is
    /// logged and the store is still returned: requests will fail one by one
    /// until the database becomes reachable.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await.map_err(StoreError::Connect)?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.app_name = Some("capjobs".to_string());
        options.connect_timeout.get_or_insert(CONNECT_TIMEOUT);
        options
            .server_selection_timeout
            .get_or_insert(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(StoreError::Connect)?;
        let store = Self {
            database: client.database(database),
            client,
        };

        match store.ping().await {
            Ok(()) => info!(database, "Successfully connected to MongoDB"),
            Err(e) => error!("Couldn't connect to the database: {e}"),
        }

        Ok(store)
    }

    /// Handle to the collection backing `keyword`.
    pub fn collection(&self, keyword: &str) -> Collection<Document> {
        self.database.collection(keyword)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(StoreError::Ping)
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, StoreError> {
        let count = self
            .collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(|source| StoreError::Query {
                collection: collection.to_string(),
                source,
            })?;
        debug!(collection, count, "counted documents");
        Ok(count)
    }

    async fn find_all(&self, collection: &str) -> Result<DocumentStream, StoreError> {
        let cursor = self
            .collection(collection)
            .find(doc! {})
            .await
            .map_err(|source| StoreError::Query {
                collection: collection.to_string(),
                source,
            })?;

        let name = collection.to_string();
        let stream = cursor.map(move |item| match item {
            Ok(document) => to_raw(document, &name),
            Err(source) => Err(StoreError::Query {
                collection: name.clone(),
                source,
            }),
        });

        Ok(stream.boxed())
    }
}

fn to_raw(document: Document, collection: &str) -> Result<RawDocument, StoreError> {
    match Bson::Document(document).into_relaxed_extjson() {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(StoreError::Decode {
            collection: collection.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

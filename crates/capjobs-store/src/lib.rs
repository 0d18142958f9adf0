//! capjobs-store — read-only access to the scraped job dataset.
//!
//! Each keyword maps to one collection in the configured database. The API
//! layer only ever talks to the [`DocumentStore`] trait, so request handling
//! can be exercised against in-memory fakes; [`MongoStore`] is the production
//! implementation.

pub mod mongo;

use async_trait::async_trait;
use capjobs_core::RawDocument;
use futures::stream::BoxStream;
use thiserror::Error;

pub use mongo::MongoStore;

/// Lazy sequence of raw documents in storage iteration order.
pub type DocumentStream = BoxStream<'static, Result<RawDocument, StoreError>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to the document store: {0}")]
    Connect(#[source] mongodb::error::Error),

    #[error("document store ping failed: {0}")]
    Ping(#[source] mongodb::error::Error),

    #[error("query on collection {collection:?} failed: {source}")]
    Query {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("document in collection {collection:?} is not an object")]
    Decode { collection: String },
}

/// Read-only view over keyword collections.
///
/// Implementations must be safe to share between concurrent requests; the
/// API holds a single instance behind an `Arc` for the process lifetime.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Liveness check against the backing database.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Number of documents stored under `collection`.
    async fn count_documents(&self, collection: &str) -> Result<u64, StoreError>;

    /// Every document under `collection`, unfiltered and unsorted.
    async fn find_all(&self, collection: &str) -> Result<DocumentStream, StoreError>;
}

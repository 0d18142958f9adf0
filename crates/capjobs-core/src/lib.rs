//! capjobs-core — shared building blocks for the capjobs API.
//!
//! This crate owns everything that does not touch the network: the
//! environment-driven [`Config`], the immutable [`KeywordRegistry`], and the
//! record types that sit at the storage/response boundary.
//!
//! # Request lifecycle
//!
//! ```text
//! rate limiter ──► keyword registry ──► store ──► ReducedRecord ──► JSON
//! ```

pub mod config;
pub mod keywords;
pub mod types;

pub use config::{Config, ConfigError};
pub use keywords::KeywordRegistry;
pub use types::{LookupResult, RawDocument, ReducedRecord};

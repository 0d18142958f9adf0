//! Static datasets used across harnesses.
//!
//! Documents mimic what the scraper writes: a capital, its state or region
//! code, and a `jobs` map keyed by job title. Some are deliberately
//! incomplete to exercise default filling.

use serde_json::{json, Value};

use super::fake_store::FakeStore;

/// Keyword list used by most harnesses.
pub const KEYWORDS: &str = "python,devops";

/// The two-document `python` collection: one bare, one complete.
pub fn python_docs() -> Vec<Value> {
    vec![
        json!({ "city": "Paris" }),
        json!({ "city": "Berlin", "state": "BE", "jobs": { "dev": 3 } }),
    ]
}

/// Store with `python` populated and `devops` present but empty.
pub fn example_store() -> FakeStore {
    FakeStore::new()
        .with_collection("python", python_docs())
        .with_collection("devops", vec![])
}

/// A realistic collection with stored metadata the API must strip.
pub fn capitals_corpus() -> Vec<Value> {
    vec![
        json!({
            "_id": { "$oid": "65a1f0c2e4b0a1b2c3d4e5f1" },
            "city": "Lisbon",
            "state": "11",
            "jobs": { "Backend Engineer": 12, "SRE": 4 },
            "scraped_at": "2024-01-15T10:00:00Z"
        }),
        json!({
            "_id": { "$oid": "65a1f0c2e4b0a1b2c3d4e5f2" },
            "city": "Madrid",
            "state": "MD",
            "jobs": { "Data Engineer": [{ "company": "Acme", "remote": true }] }
        }),
        json!({
            "_id": { "$oid": "65a1f0c2e4b0a1b2c3d4e5f3" },
            "city": "Vienna",
            "jobs": {}
        }),
        json!({
            "_id": { "$oid": "65a1f0c2e4b0a1b2c3d4e5f4" },
            "state": "AT"
        }),
    ]
}

/// Expected reduced form of [`capitals_corpus`], in the same order.
pub fn capitals_corpus_reduced() -> Value {
    json!([
        { "city": "Lisbon", "state": "11", "jobs": { "Backend Engineer": 12, "SRE": 4 } },
        { "city": "Madrid", "state": "MD", "jobs": { "Data Engineer": [{ "company": "Acme", "remote": true }] } },
        { "city": "Vienna", "state": "", "jobs": {} },
        { "city": "", "state": "AT", "jobs": {} },
    ])
}

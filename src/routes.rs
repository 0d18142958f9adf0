use std::io::ErrorKind;
use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::Uri,
    response::Html,
    Json,
};
use capjobs_core::{KeywordRegistry, LookupResult, ReducedRecord};
use capjobs_store::DocumentStore;
use futures::TryStreamExt;
use serde::Serialize;
use tracing::info;

use crate::{error::AppError, state::AppState};

#[derive(Serialize)]
pub struct KeywordList {
    valid_keywords: Vec<String>,
}

pub async fn root_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let path = &state.index_html;

    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(Html(body)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::MissingStaticAsset(format!(
            "{e}: '{}'",
            path.display()
        ))),
        Err(e) => Err(AppError::Internal(format!(
            "failed to read {}: {e}",
            path.display()
        ))),
    }
}

pub async fn keywords_handler(State(state): State<Arc<AppState>>) -> Json<KeywordList> {
    Json(KeywordList {
        valid_keywords: state.keywords.all().to_vec(),
    })
}

/// A segment that doesn't decode to UTF-8 can't name a collection, so it is
/// reported as an invalid keyword using the raw segment.
pub async fn capital_keyword_jobs_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    keyword: Result<Path<String>, PathRejection>,
) -> Result<Json<LookupResult>, AppError> {
    let keyword = match keyword {
        Ok(Path(keyword)) => keyword,
        Err(_) => {
            let raw = uri.path().rsplit('/').next().unwrap_or_default();
            return Err(AppError::InvalidKeyword(raw.to_string()));
        }
    };
    let result = lookup(&state.keywords, state.store.as_ref(), keyword).await?;
    info!(keyword = %result.keyword, records = result.len(), "lookup served");
    Ok(Json(result))
}

// The stubs take no extractors so every input, decodable or not, gets 405.
pub async fn capital_city_jobs_handler() -> AppError {
    AppError::NotImplemented
}

pub async fn capital_city_keyword_jobs_handler() -> AppError {
    AppError::NotImplemented
}

pub async fn not_found_handler() -> AppError {
    AppError::RouteNotFound
}

/// Resolve a keyword to every reduced record in its collection.
///
/// Storage is only touched once `keyword` has passed the registry. An empty
/// collection is reported as [`AppError::NotFound`] rather than an empty list.
pub async fn lookup(
    keywords: &KeywordRegistry,
    store: &dyn DocumentStore,
    keyword: String,
) -> Result<LookupResult, AppError> {
    if !keywords.is_valid(&keyword) {
        return Err(AppError::InvalidKeyword(keyword));
    }

    if store.count_documents(&keyword).await? == 0 {
        return Err(AppError::NotFound(keyword));
    }

    let records: Vec<ReducedRecord> = store
        .find_all(&keyword)
        .await?
        .map_ok(|doc| ReducedRecord::from_document(&doc))
        .try_collect()
        .await?;

    Ok(LookupResult::new(keyword, records))
}

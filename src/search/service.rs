//! Search orchestration: request construction, execution against the
//! store, and typed result assembly.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::SearchResult;
use crate::search::query::build_search_body;
use crate::store::{EsSearchResponse, PostSource, PostStore};
use crate::types::{SearchQuery, SearchResponse};

/// Coordinates query building, store execution, and result assembly
pub struct SearchService {
    store: Arc<PostStore>,
}

impl SearchService {
    pub fn new(store: Arc<PostStore>) -> Self {
        SearchService { store }
    }

    /// Run a free-text search.
    ///
    /// An empty query short-circuits to an empty result set without
    /// contacting the store. Otherwise a single retrieval request is
    /// executed and its response assembled in engine order.
    pub async fn search(&self, params: SearchQuery) -> SearchResult<SearchResponse> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            query = %params.query,
            page = params.page,
            size = params.size,
            sort_by = ?params.sort_by,
            sort_order = %params.sort_order,
            "Search request received"
        );

        if params.query.is_empty() {
            info!(%request_id, "No search query provided, returning empty results");
            return Ok(SearchResponse {
                total: 0,
                hits: Vec::new(),
                page: params.page,
                size: params.size,
                took_ms: None,
            });
        }

        let body = build_search_body(
            &params.query,
            params.sort_by.as_deref(),
            &params.sort_order,
            params.page,
            params.size,
        );
        debug!(%request_id, body = %body, "Executing search");

        let start = Instant::now();
        let result: SearchResult<EsSearchResponse<PostSource>> =
            self.store.client().search(&body).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                error!(%request_id, elapsed_ms, "Search failed after {}ms: {}", elapsed_ms, e);
                return Err(e);
            }
        };

        debug!(%request_id, engine_took_ms = raw.took, "Engine reported timing");

        let response = assemble(raw, params.page, params.size, elapsed_ms);
        info!(
            %request_id,
            total = response.total,
            returned = response.hits.len(),
            elapsed_ms,
            "Search completed"
        );
        Ok(response)
    }
}

/// Map the engine response into the typed result: hits in engine order
/// with id and score overlaid, exact total, echoed pagination, and the
/// caller-measured execution time
pub(crate) fn assemble(
    raw: EsSearchResponse<PostSource>,
    page: u32,
    size: u32,
    elapsed_ms: u64,
) -> SearchResponse {
    let total = raw.hits.total.value;
    let hits = raw
        .hits
        .hits
        .into_iter()
        .map(|hit| hit.source.into_post(hit.id, hit.score))
        .collect();

    SearchResponse {
        total,
        hits,
        page,
        size,
        took_ms: Some(elapsed_ms),
    }
}

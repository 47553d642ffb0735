//! Tag discovery via a terms aggregation on the keyword `tags` field.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::SearchResult;
use crate::store::{EsAggResponse, PostStore};

/// Upper bound on distinct tag buckets requested from the engine
const MAX_TAG_BUCKETS: u32 = 1000;

/// Lists distinct tags with a zero-hit aggregation query
pub struct TagService {
    store: Arc<PostStore>,
}

impl TagService {
    pub fn new(store: Arc<PostStore>) -> Self {
        TagService { store }
    }

    /// Distinct tags in the order the engine emits aggregation buckets
    /// (frequency-descending by engine convention; not re-sorted here).
    /// Per-tag document counts are logged as a diagnostic, not returned.
    pub async fn list_tags(&self) -> SearchResult<Vec<String>> {
        debug!("Executing tag aggregation query");
        let body = aggregation_body();
        let response: EsAggResponse = self.store.client().search(&body).await?;

        let buckets = response.aggregations.unique_tags.buckets;
        let counts: Vec<String> = buckets
            .iter()
            .map(|bucket| format!("{}={}", bucket.key, bucket.doc_count))
            .collect();
        let tags: Vec<String> = buckets.into_iter().map(|bucket| bucket.key).collect();

        info!("Retrieved {} unique tags", tags.len());
        debug!("Tag distribution: {}", counts.join(", "));

        Ok(tags)
    }
}

/// Zero-hit search body whose sole purpose is the terms aggregation
fn aggregation_body() -> Value {
    json!({
        "size": 0,
        "aggs": {
            "unique_tags": {
                "terms": {
                    "field": "tags",
                    "size": MAX_TAG_BUCKETS
                }
            }
        }
    })
}

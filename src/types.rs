use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored forum post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Engine-assigned identifier, immutable after creation
    pub id: String,
    /// Post title
    pub title: String,
    /// Full post content
    pub content: String,
    /// Tags, always lowercase in storage
    #[serde(default)]
    pub tags: Vec<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every content mutation
    pub updated_at: DateTime<Utc>,
    /// Relevance score assigned by the engine for a specific query;
    /// present only on search hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Payload for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreate {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a post; field presence, not value, decides what
/// is overwritten
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostUpdate {
    /// True when no field is present, making the update a content no-op
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

/// Query parameters for the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Free-text query; empty short-circuits to an empty result set
    #[serde(default)]
    pub query: String,
    /// Comma-separated tag filter; accepted but not applied as a
    /// filter clause
    #[serde(default)]
    pub tags: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page length
    #[serde(default = "default_size")]
    pub size: u32,
    /// Primary sort field; relevance tie-break is always appended
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Passed through to the engine unvalidated
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            query: String::new(),
            tags: None,
            page: default_page(),
            size: default_size(),
            sort_by: None,
            sort_order: default_sort_order(),
        }
    }
}

/// Paginated search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Exact matched-document count, independent of pagination
    pub total: u64,
    /// Hits in engine order, each carrying a relevance score
    pub hits: Vec<Post>,
    pub page: u32,
    pub size: u32,
    /// Wall-clock execution time measured by the service; absent on the
    /// empty-query short-circuit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub took_ms: Option<u64>,
}

/// Pagination parameters for the post listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    10
}

fn default_sort_order() -> String {
    "desc".to_string()
}

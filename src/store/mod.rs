//! Document store adapter over the Elasticsearch HTTP API.
//!
//! Wraps the raw index client with the post lifecycle semantics:
//! timestamps on create and update, tag normalization before any write,
//! partial-update merge, and index bootstrap.

mod es_client;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::ElasticsearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::types::{Post, PostCreate, PostUpdate};

pub use es_client::{
    EsAggResponse, EsAggregations, EsClient, EsHit, EsHits, EsSearchResponse, EsTermsAggregation,
    EsTermsBucket, EsTotal, GetResponse, IndexedResponse,
};

/// Stored document fields, without the engine-held id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSource {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostSource {
    /// Attach the engine id, and optionally a relevance score, to the
    /// stored fields
    pub fn into_post(self, id: String, score: Option<f64>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
            score,
        }
    }
}

/// Lowercase every tag; stored and compared tags are always lowercase
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_lowercase()).collect()
}

/// Zero-based result offset for 1-based pagination
pub fn offset(page: u32, size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(size)
}

/// Overlay the fields present in the update; absent fields are untouched
fn apply_update(source: &mut PostSource, update: PostUpdate) {
    if let Some(title) = update.title {
        source.title = title;
    }
    if let Some(content) = update.content {
        source.content = content;
    }
    if let Some(tags) = update.tags {
        source.tags = normalize_tags(&tags);
    }
}

/// Document store adapter: point operations with post semantics, plus
/// raw query access for the search and tag services
pub struct PostStore {
    client: EsClient,
}

impl PostStore {
    pub fn new(config: &ElasticsearchConfig) -> SearchResult<Self> {
        Ok(PostStore {
            client: EsClient::new(config)?,
        })
    }

    /// Raw engine access for search and aggregation bodies
    pub fn client(&self) -> &EsClient {
        &self.client
    }

    /// Create the posts index with its field mappings when missing
    pub async fn ensure_index(&self) -> SearchResult<()> {
        if self.client.index_exists().await? {
            info!("Index '{}' already exists", self.client.index_name());
            return Ok(());
        }

        info!("Creating index '{}'", self.client.index_name());
        let body = json!({
            "mappings": {
                "properties": {
                    "title": {"type": "text", "analyzer": "standard"},
                    "content": {"type": "text", "analyzer": "standard"},
                    "tags": {"type": "keyword"},
                    "created_at": {"type": "date"},
                    "updated_at": {"type": "date"}
                }
            }
        });
        self.client.create_index(&body).await?;
        info!("Index '{}' created", self.client.index_name());
        Ok(())
    }

    /// Store a new post: timestamps assigned now, tags lowercased, id
    /// assigned by the engine
    pub async fn create(&self, post: PostCreate) -> SearchResult<Post> {
        let now = Utc::now();
        let source = PostSource {
            title: post.title,
            content: post.content,
            tags: normalize_tags(&post.tags),
            created_at: now,
            updated_at: now,
        };

        let document = serde_json::to_value(&source)?;
        let indexed = self.client.index_doc(&document).await?;
        info!("Post created with id: {}", indexed.id);

        Ok(source.into_post(indexed.id, None))
    }

    /// Fetch a post by id
    pub async fn get(&self, id: &str) -> SearchResult<Post> {
        let response = self.client.get_doc::<PostSource>(id).await?;
        let source = response
            .source
            .ok_or_else(|| SearchError::NotFound(format!("Post not found: {}", id)))?;
        debug!("Retrieved post: {}", response.id);
        Ok(source.into_post(response.id, None))
    }

    /// List posts newest-first, unfiltered
    pub async fn list(&self, page: u32, size: u32) -> SearchResult<Vec<Post>> {
        let body = json!({
            "query": {"match_all": {}},
            "sort": [{"created_at": "desc"}],
            "from": offset(page, size),
            "size": size
        });

        let response: EsSearchResponse<PostSource> = self.client.search(&body).await?;
        debug!(
            "Retrieved {} posts out of {} total",
            response.hits.hits.len(),
            response.hits.total.value
        );

        Ok(response
            .hits
            .hits
            .into_iter()
            .map(|hit| hit.source.into_post(hit.id, None))
            .collect())
    }

    /// Merge the fields present in the update into the stored post.
    ///
    /// An update carrying no fields is a content no-op: the current
    /// document is returned unchanged and nothing is written back.
    /// Otherwise `updated_at` is refreshed and the full merged document
    /// is written.
    pub async fn update(&self, id: &str, update: PostUpdate) -> SearchResult<Post> {
        let current = self.client.get_doc::<PostSource>(id).await?;
        let mut source = current
            .source
            .ok_or_else(|| SearchError::NotFound(format!("Post not found: {}", id)))?;

        if update.is_empty() {
            debug!("No changes provided for post {}", id);
            return Ok(source.into_post(current.id, None));
        }

        apply_update(&mut source, update);
        source.updated_at = Utc::now();

        let document = serde_json::to_value(&source)?;
        self.client.update_doc(id, &document).await?;
        info!("Post {} updated", id);

        Ok(source.into_post(current.id, None))
    }

    /// Remove a post by id
    pub async fn delete(&self, id: &str) -> SearchResult<()> {
        self.client.delete_doc(id).await?;
        info!("Post {} deleted", id);
        Ok(())
    }

    /// Check engine reachability
    pub async fn health_check(&self) -> SearchResult<()> {
        self.client.ping().await
    }
}

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ElasticsearchConfig;
use crate::error::{SearchError, SearchResult};

/// Thin HTTP client for the Elasticsearch REST API.
///
/// One instance is built at startup and shared process-wide; the inner
/// `reqwest::Client` is thread-safe, so no locking is needed. Engine
/// payloads are loosely typed JSON; every response is decoded into one of
/// the explicit shapes below, and a decode failure is a store failure.
pub struct EsClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
}

/// Engine acknowledgement for a document write
#[derive(Debug, Deserialize)]
pub struct IndexedResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub result: String,
}

/// Engine response for a point read
#[derive(Debug, Deserialize)]
pub struct GetResponse<S> {
    #[serde(rename = "_id")]
    pub id: String,
    pub found: bool,
    #[serde(rename = "_source")]
    pub source: Option<S>,
}

/// Engine response for a search request
#[derive(Debug, Deserialize)]
pub struct EsSearchResponse<S> {
    /// Engine-measured execution time in milliseconds
    pub took: u64,
    pub hits: EsHits<S>,
}

#[derive(Debug, Deserialize)]
pub struct EsHits<S> {
    pub total: EsTotal,
    pub hits: Vec<EsHit<S>>,
}

/// Matched-document count; `track_total_hits: true` keeps `relation`
/// at `eq` so `value` is exact rather than a lower bound
#[derive(Debug, Deserialize)]
pub struct EsTotal {
    pub value: u64,
    pub relation: String,
}

#[derive(Debug, Deserialize)]
pub struct EsHit<S> {
    #[serde(rename = "_id")]
    pub id: String,
    /// Null when the engine sorts without scoring
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: S,
}

/// Engine response for an aggregation-only search
#[derive(Debug, Deserialize)]
pub struct EsAggResponse {
    pub took: u64,
    pub aggregations: EsAggregations,
}

#[derive(Debug, Deserialize)]
pub struct EsAggregations {
    pub unique_tags: EsTermsAggregation,
}

/// Terms aggregation buckets, in the order the engine emits them
#[derive(Debug, Deserialize)]
pub struct EsTermsAggregation {
    pub buckets: Vec<EsTermsBucket>,
}

#[derive(Debug, Deserialize)]
pub struct EsTermsBucket {
    pub key: String,
    pub doc_count: u64,
}

impl EsClient {
    /// Create a new client. Does not contact the cluster; use `ping`
    /// or `index_exists` for that.
    pub fn new(config: &ElasticsearchConfig) -> SearchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .danger_accept_invalid_certs(!config.verify_certs)
            .build()
            .map_err(|e| SearchError::Store(format!("Failed to build HTTP client: {}", e)))?;

        Ok(EsClient {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        })
    }

    /// Name of the index this client operates on
    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, id)
    }

    /// Index a new document, returning the engine-assigned id
    pub async fn index_doc(&self, document: &Value) -> SearchResult<IndexedResponse> {
        let url = format!("{}/{}/_doc", self.base_url, self.index);
        let response = self
            .http
            .post(&url)
            .json(document)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Index request failed: {}", e)))?;
        Self::decode(response).await
    }

    /// Fetch a document by id; `NotFound` when the engine reports 404
    pub async fn get_doc<S: DeserializeOwned>(&self, id: &str) -> SearchResult<GetResponse<S>> {
        let response = self
            .http
            .get(self.doc_url(id))
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Get request failed: {}", e)))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SearchError::NotFound(format!("Post not found: {}", id)));
        }
        Self::decode(response).await
    }

    /// Overwrite a stored document with the given merged body
    pub async fn update_doc(&self, id: &str, document: &Value) -> SearchResult<IndexedResponse> {
        let url = format!("{}/{}/_update/{}", self.base_url, self.index, id);
        let body = serde_json::json!({ "doc": document });
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Update request failed: {}", e)))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SearchError::NotFound(format!("Post not found: {}", id)));
        }
        Self::decode(response).await
    }

    /// Remove a document by id; `NotFound` when the engine reports 404
    pub async fn delete_doc(&self, id: &str) -> SearchResult<()> {
        let response = self
            .http
            .delete(self.doc_url(id))
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Delete request failed: {}", e)))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SearchError::NotFound(format!("Post not found: {}", id)));
        }
        let _: IndexedResponse = Self::decode(response).await?;
        Ok(())
    }

    /// Execute a search body, decoding into the caller's response shape.
    /// Hit and aggregation responses share this entry point.
    pub async fn search<T: DeserializeOwned>(&self, body: &Value) -> SearchResult<T> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        debug!("Executing search against {}", url);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Search request failed: {}", e)))?;
        Self::decode(response).await
    }

    /// Check whether the index exists
    pub async fn index_exists(&self) -> SearchResult<bool> {
        let url = format!("{}/{}", self.base_url, self.index);
        let response = self
            .http
            .head(&url)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Index check failed: {}", e)))?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SearchError::Store(format!(
                "Index check returned {}",
                status
            ))),
        }
    }

    /// Create the index with the given settings and mappings body
    pub async fn create_index(&self, body: &Value) -> SearchResult<()> {
        let url = format!("{}/{}", self.base_url, self.index);
        let response = self
            .http
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Index creation failed: {}", e)))?;
        let _: Value = Self::decode(response).await?;
        Ok(())
    }

    /// Raw index statistics, for diagnostics
    pub async fn index_stats(&self) -> SearchResult<Value> {
        let url = format!("{}/{}/_stats", self.base_url, self.index);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Stats request failed: {}", e)))?;
        Self::decode(response).await
    }

    /// Raw document count, for diagnostics
    pub async fn count(&self) -> SearchResult<Value> {
        let url = format!("{}/{}/_count", self.base_url, self.index);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Count request failed: {}", e)))?;
        Self::decode(response).await
    }

    /// Check cluster reachability
    pub async fn ping(&self) -> SearchResult<()> {
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| SearchError::Store(format!("Ping failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(SearchError::Store(format!(
                "Cluster returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Decode an engine response, converting non-success statuses and
    /// malformed payloads into store failures carrying the engine message
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> SearchResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Store(format!("Failed to read response body: {}", e)))?;
        if !status.is_success() {
            return Err(SearchError::Store(format!(
                "Engine returned {}: {}",
                status, body
            )));
        }
        serde_json::from_str(&body)
            .map_err(|e| SearchError::Store(format!("Failed to decode engine response: {}", e)))
    }
}

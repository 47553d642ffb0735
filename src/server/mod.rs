//! HTTP server wiring: routes, shared state, CORS, and error mapping.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{SearchError, SearchResult};
use crate::search::SearchService;
use crate::store::PostStore;
use crate::tags::TagService;
use crate::types::{ListParams, Post, PostCreate, PostUpdate, SearchQuery, SearchResponse};

/// Main HTTP server
pub struct Server {
    app: Router,
    config: Config,
}

/// Shared application state, constructed once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
    pub search: Arc<SearchService>,
    pub tags: Arc<TagService>,
}

/// JSON error body returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error = if self.is_not_found() {
            "Not found"
        } else {
            "Internal server error"
        };
        let body = ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl Server {
    /// Create a new server instance: build the store, bootstrap the
    /// index, and wire up routes
    pub async fn new(config: Config) -> SearchResult<Self> {
        info!("Initializing server components");

        let store = Arc::new(PostStore::new(&config.elasticsearch)?);

        // Bootstrap the posts index before accepting traffic
        store.ensure_index().await?;

        let search = Arc::new(SearchService::new(store.clone()));
        let tags = Arc::new(TagService::new(store.clone()));
        let state = AppState {
            store,
            search,
            tags,
        };

        let cors = cors_layer(&config)?;

        let mut app = Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route(
                "/api/posts",
                get(list_posts_handler).post(create_post_handler),
            )
            .route(
                "/api/posts/:id",
                get(get_post_handler)
                    .put(update_post_handler)
                    .delete(delete_post_handler),
            )
            .route("/api/search", get(search_handler))
            .route("/api/tags", get(list_tags_handler));

        // Debug routes resolve the capability flag once here, never
        // per request
        if config.enable_debug_endpoints {
            warn!("Debug endpoints are ENABLED. Ensure this is not enabled in production!");
            app = app
                .route("/debug/index-stats", get(debug_index_stats_handler))
                .route("/debug/get-post/:id", get(debug_get_post_handler))
                .route("/debug/create-test-post", get(debug_create_test_post_handler));
        } else {
            warn!("Debug endpoints are DISABLED. Set ENABLE_DEBUG_ENDPOINTS=true to enable them.");
        }

        let app = app.layer(cors).with_state(state);

        info!("Server initialized successfully");
        Ok(Server { app, config })
    }

    /// Run the HTTP server until shutdown
    pub async fn run(self) -> SearchResult<()> {
        let bind_addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| SearchError::Config(format!("Failed to bind to {}: {}", bind_addr, e)))?;

        info!("HTTP server listening on {}", bind_addr);

        axum::serve(listener, self.app)
            .await
            .map_err(|e| SearchError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// CORS restricted to the configured frontend origins, with credentials
fn cors_layer(config: &Config) -> SearchResult<CorsLayer> {
    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| SearchError::Config(format!("Invalid CORS origin '{}': {}", origin, e)))
        })
        .collect::<SearchResult<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Forum Search API" }))
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let status = match state.store.health_check().await {
        Ok(_) => "healthy",
        Err(_) => "degraded",
    };
    Json(json!({ "status": status, "timestamp": chrono::Utc::now() }))
}

async fn create_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<PostCreate>,
) -> Result<Json<Post>, SearchError> {
    info!("Creating new post with title: {}", payload.title);
    let post = state.store.create(payload).await?;
    Ok(Json(post))
}

async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, SearchError> {
    info!("Fetching post with id: {}", id);
    let post = state.store.get(&id).await?;
    Ok(Json(post))
}

async fn list_posts_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Post>>, SearchError> {
    info!("Listing posts (page={}, size={})", params.page, params.size);
    let posts = state.store.list(params.page, params.size).await?;
    Ok(Json(posts))
}

async fn update_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PostUpdate>,
) -> Result<Json<Post>, SearchError> {
    info!("Updating post {}", id);
    let post = state.store.update(&id, payload).await?;
    Ok(Json(post))
}

async fn delete_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SearchError> {
    info!("Deleting post with id: {}", id);
    state.store.delete(&id).await?;
    Ok(Json(json!({ "message": "Post deleted successfully" })))
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    let response = state.search.search(params).await?;
    Ok(Json(response))
}

async fn list_tags_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, SearchError> {
    let tags = state.tags.list_tags().await?;
    Ok(Json(tags))
}

async fn debug_index_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, SearchError> {
    info!("Fetching index statistics");
    let stats = state.store.client().index_stats().await?;
    let count = state.store.client().count().await?;
    Ok(Json(json!({ "stats": stats, "count": count })))
}

async fn debug_get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SearchError> {
    info!("Fetching raw post data for id: {}", id);
    let response = state.store.client().get_doc::<Value>(&id).await?;
    let source = response
        .source
        .ok_or_else(|| SearchError::NotFound(format!("Post not found: {}", id)))?;
    Ok(Json(source))
}

async fn debug_create_test_post_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, SearchError> {
    info!("Creating test post");
    let post = state
        .store
        .create(PostCreate {
            title: "Test Post".to_string(),
            content: "This is a test post for debugging search functionality.".to_string(),
            tags: vec!["test".to_string(), "debug".to_string()],
        })
        .await?;
    Ok(Json(json!({ "message": "Test post created", "id": post.id })))
}

use super::*;
use crate::types::{PostCreate, PostUpdate};

/// Helper to build a store config pointing at a local test cluster
fn test_es_config() -> ElasticsearchConfig {
    ElasticsearchConfig {
        url: std::env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| "http://localhost:9200".to_string()),
        index: "posts_test".to_string(),
        verify_certs: true,
        request_timeout_ms: 5000,
    }
}

/// Helper to build stored fields for a sample post
fn sample_source() -> PostSource {
    let now = Utc::now();
    PostSource {
        title: "Intro".to_string(),
        content: "hello forum".to_string(),
        tags: vec!["general".to_string()],
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn normalize_tags_lowercases_every_tag() {
    let tags = vec![
        "Test".to_string(),
        "DEBUG".to_string(),
        "rust".to_string(),
    ];
    assert_eq!(normalize_tags(&tags), vec!["test", "debug", "rust"]);
}

#[test]
fn normalize_tags_keeps_empty_input_empty() {
    assert!(normalize_tags(&[]).is_empty());
}

#[test]
fn offset_converts_one_based_pages() {
    assert_eq!(offset(1, 10), 0);
    assert_eq!(offset(2, 10), 10);
    assert_eq!(offset(3, 25), 50);
}

#[test]
fn offset_clamps_page_zero() {
    assert_eq!(offset(0, 10), 0);
}

#[test]
fn apply_update_overlays_only_present_fields() {
    let mut source = sample_source();
    let original_content = source.content.clone();
    let original_tags = source.tags.clone();

    apply_update(
        &mut source,
        PostUpdate {
            title: Some("Updated title".to_string()),
            content: None,
            tags: None,
        },
    );

    assert_eq!(source.title, "Updated title");
    assert_eq!(source.content, original_content);
    assert_eq!(source.tags, original_tags);
}

#[test]
fn apply_update_lowercases_tags() {
    let mut source = sample_source();

    apply_update(
        &mut source,
        PostUpdate {
            title: None,
            content: None,
            tags: Some(vec!["Test".to_string(), "DEBUG".to_string()]),
        },
    );

    assert_eq!(source.tags, vec!["test", "debug"]);
}

#[test]
fn empty_update_is_detected() {
    assert!(PostUpdate::default().is_empty());
    assert!(!PostUpdate {
        title: Some("t".to_string()),
        content: None,
        tags: None,
    }
    .is_empty());
}

#[test]
fn into_post_overlays_id_and_score() {
    let source = sample_source();
    let post = source.clone().into_post("abc123".to_string(), Some(1.5));
    assert_eq!(post.id, "abc123");
    assert_eq!(post.title, source.title);
    assert_eq!(post.score, Some(1.5));

    let post = source.into_post("abc123".to_string(), None);
    assert!(post.score.is_none());
}

#[test]
fn get_response_decodes_engine_payload() {
    let raw = r#"{
        "_index": "posts",
        "_id": "abc123",
        "_version": 1,
        "found": true,
        "_source": {
            "title": "Intro",
            "content": "hello forum",
            "tags": ["general"],
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }
    }"#;

    let decoded: GetResponse<PostSource> = serde_json::from_str(raw).unwrap();
    assert_eq!(decoded.id, "abc123");
    assert!(decoded.found);
    let source = decoded.source.unwrap();
    assert_eq!(source.title, "Intro");
    assert_eq!(source.tags, vec!["general"]);
}

#[test]
fn indexed_response_decodes_engine_payload() {
    let raw = r#"{"_index": "posts", "_id": "xyz789", "result": "created", "_version": 1}"#;
    let decoded: IndexedResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(decoded.id, "xyz789");
    assert_eq!(decoded.result, "created");
}

#[test]
fn missing_tags_field_defaults_to_empty() {
    let raw = r#"{
        "title": "No tags",
        "content": "body",
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:00:00Z"
    }"#;
    let source: PostSource = serde_json::from_str(raw).unwrap();
    assert!(source.tags.is_empty());
}

#[tokio::test]
#[ignore = "requires Elasticsearch"]
async fn crud_round_trip() {
    let store = PostStore::new(&test_es_config()).unwrap();
    store.ensure_index().await.unwrap();

    let created = store
        .create(PostCreate {
            title: "Intro".to_string(),
            content: "hello forum".to_string(),
            tags: vec!["General".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(created.tags, vec!["general"]);
    assert!(created.score.is_none());

    let fetched = store.get(&created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.content, created.content);
    assert_eq!(fetched.tags, created.tags);
    assert!(fetched.score.is_none());

    store.delete(&created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Elasticsearch"]
async fn empty_update_returns_current_document() {
    let store = PostStore::new(&test_es_config()).unwrap();
    store.ensure_index().await.unwrap();

    let created = store
        .create(PostCreate {
            title: "Unchanged".to_string(),
            content: "original content".to_string(),
            tags: vec!["keep".to_string()],
        })
        .await
        .unwrap();

    let updated = store.update(&created.id, PostUpdate::default()).await.unwrap();
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.content, created.content);
    assert_eq!(updated.tags, created.tags);
    assert_eq!(updated.updated_at, created.updated_at);

    store.delete(&created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Elasticsearch"]
async fn missing_id_is_not_found() {
    let store = PostStore::new(&test_es_config()).unwrap();
    store.ensure_index().await.unwrap();

    let err = store.get("does-not-exist").await.unwrap_err();
    assert!(err.is_not_found());

    let err = store.delete("does-not-exist").await.unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .update(
            "does-not-exist",
            PostUpdate {
                title: Some("x".to_string()),
                content: None,
                tags: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

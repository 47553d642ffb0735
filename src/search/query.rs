//! Retrieval request construction for free-text search.

use serde_json::{json, Map, Value};

/// Field boosts for the multi-field match: title outweighs content
const MATCH_FIELDS: [&str; 2] = ["title^3", "content^2"];

/// Characters that must match exactly before fuzzy edits apply; keeps
/// short-term fuzzy noise out of the result set
const FUZZY_PREFIX_LENGTH: u32 = 2;

/// Build the match clause for a non-empty query: terms OR-combined,
/// edit distance resolved from term length
pub fn match_clause(query: &str) -> Value {
    json!({
        "multi_match": {
            "query": query,
            "fields": MATCH_FIELDS,
            "type": "best_fields",
            "fuzziness": "AUTO",
            "prefix_length": FUZZY_PREFIX_LENGTH,
            "operator": "or"
        }
    })
}

/// Two-level sort key: the caller's field and direction when supplied,
/// newest-first otherwise; relevance score is always appended as the
/// tie-break. `sort_order` is passed through unvalidated.
pub fn sort_spec(sort_by: Option<&str>, sort_order: &str) -> Value {
    let primary = match sort_by {
        Some(field) => {
            let mut spec = Map::new();
            spec.insert(field.to_string(), Value::String(sort_order.to_string()));
            Value::Object(spec)
        }
        None => json!({"created_at": "desc"}),
    };
    json!([primary, "_score"])
}

/// Assemble the full retrieval body: boolean must clause, sort spec,
/// pagination offsets, and exact total counting. Callers must skip this
/// entirely for an empty query.
pub fn build_search_body(
    query: &str,
    sort_by: Option<&str>,
    sort_order: &str,
    page: u32,
    size: u32,
) -> Value {
    json!({
        "query": {
            "bool": {
                "must": [match_clause(query)],
                "should": [],
                "filter": []
            }
        },
        "sort": sort_spec(sort_by, sort_order),
        "from": crate::store::offset(page, size),
        "size": size,
        "track_total_hits": true
    })
}

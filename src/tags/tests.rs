use super::*;

#[test]
fn aggregation_body_requests_zero_hits() {
    let body = aggregation_body();
    assert_eq!(body["size"], 0);
}

#[test]
fn aggregation_body_targets_tags_keyword_field() {
    let body = aggregation_body();
    let terms = &body["aggs"]["unique_tags"]["terms"];
    assert_eq!(terms["field"], "tags");
    assert_eq!(terms["size"], 1000);
}

#[test]
fn buckets_decode_in_engine_order() {
    let raw = r#"{
        "took": 2,
        "timed_out": false,
        "hits": {
            "total": {"value": 7, "relation": "eq"},
            "hits": []
        },
        "aggregations": {
            "unique_tags": {
                "doc_count_error_upper_bound": 0,
                "sum_other_doc_count": 0,
                "buckets": [
                    {"key": "rust", "doc_count": 5},
                    {"key": "general", "doc_count": 2},
                    {"key": "debug", "doc_count": 1}
                ]
            }
        }
    }"#;

    let decoded: EsAggResponse = serde_json::from_str(raw).unwrap();
    let buckets = decoded.aggregations.unique_tags.buckets;

    let keys: Vec<&str> = buckets.iter().map(|bucket| bucket.key.as_str()).collect();
    assert_eq!(keys, vec!["rust", "general", "debug"]);
    assert_eq!(buckets[0].doc_count, 5);
}

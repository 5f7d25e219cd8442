use mockito::Matcher;
use pretty_assertions::assert_eq;
use review_insights::{
    AnalysisResult, Insight, InsightsError, MemoryStore, ReviewStore, SecureApiKey, Sentiment,
    SupabaseStore,
};
use serde_json::json;


use test_helpers::date;

fn record(id: &str, y: i32, m: u32, d: u32, sentiment: Sentiment) -> AnalysisResult {
    AnalysisResult {
        review_id: id.to_string(),
        review_date: date(y, m, d),
        rating: "4".to_string(),
        original_text: format!("review {}", id),
        overall_sentiment: sentiment,
        insights: vec![Insight {
            sentiment,
            topic: "delivery".to_string(),
            problem: None,
            suggestion: None,
        }],
    }
}

#[tokio::test]
async fn memory_store_upsert_overwrites_by_id() {
    let store = MemoryStore::new();
    store.upsert(&record("R1", 2025, 1, 1, Sentiment::Positive)).await.unwrap();
    store.upsert(&record("R1", 2025, 1, 1, Sentiment::Negative)).await.unwrap();

    assert_eq!(store.len(), 1);
    let stored = store.get("R1").await.unwrap().unwrap();
    assert_eq!(stored.overall_sentiment, Sentiment::Negative);
}

#[tokio::test]
async fn memory_store_get_missing_is_none() {
    let store = MemoryStore::new();
    assert!(store.get("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn memory_store_lists_newest_first_with_limit() {
    let store = MemoryStore::new();
    store.upsert(&record("old", 2024, 6, 1, Sentiment::Neutral)).await.unwrap();
    store.upsert(&record("new", 2025, 3, 1, Sentiment::Neutral)).await.unwrap();
    store.upsert(&record("mid", 2025, 1, 1, Sentiment::Neutral)).await.unwrap();

    let ids: Vec<String> = store
        .list(10)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.review_id)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);

    assert_eq!(store.list(2).await.unwrap().len(), 2);
    assert!(store.list(0).await.unwrap().is_empty());
}

fn supabase_for(server: &mockito::ServerGuard) -> SupabaseStore {
    SupabaseStore::new(&server.url(), SecureApiKey::new("service-key")).unwrap()
}

fn row_json(result: &AnalysisResult) -> serde_json::Value {
    let mut row = serde_json::to_value(result).unwrap();
    // PostgREST returns table columns the record does not model
    row["created_at"] = json!("2025-01-01T10:00:00Z");
    row
}

#[tokio::test]
async fn supabase_upsert_posts_with_merge_preference() {
    let mut server = mockito::Server::new_async().await;
    let result = record("R1", 2025, 1, 1, Sentiment::Neutral);
    let mock = server
        .mock("POST", "/rest/v1/review_insights")
        .match_query(Matcher::UrlEncoded("on_conflict".into(), "review_id".into()))
        .match_header("apikey", "service-key")
        .match_header("authorization", "Bearer service-key")
        .match_header("prefer", Matcher::Regex("resolution=merge-duplicates".into()))
        .match_body(Matcher::PartialJson(json!([
            { "review_id": "R1", "review_date": "2025-01-01" }
        ])))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!([row_json(&result)]).to_string())
        .create_async()
        .await;

    let saved = supabase_for(&server).upsert(&result).await.unwrap();
    assert_eq!(saved, result);
    mock.assert_async().await;
}

#[tokio::test]
async fn supabase_get_filters_by_id() {
    let mut server = mockito::Server::new_async().await;
    let result = record("R7", 2025, 2, 1, Sentiment::Positive);
    server
        .mock("GET", "/rest/v1/review_insights")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("review_id".into(), "eq.R7".into()),
        ]))
        .with_status(200)
        .with_body(json!([row_json(&result)]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/review_insights")
        .match_query(Matcher::UrlEncoded("review_id".into(), "eq.missing".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let store = supabase_for(&server);
    assert_eq!(store.get("R7").await.unwrap(), Some(result));
    assert_eq!(store.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn supabase_list_orders_by_date_desc() {
    let mut server = mockito::Server::new_async().await;
    let rows = vec![
        record("B", 2025, 2, 1, Sentiment::Positive),
        record("A", 2025, 1, 1, Sentiment::Negative),
    ];
    let mock = server
        .mock("GET", "/rest/v1/review_insights")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("order".into(), "review_date.desc".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(json!(rows.iter().map(row_json).collect::<Vec<_>>()).to_string())
        .create_async()
        .await;

    let listed = supabase_for(&server).list(5).await.unwrap();
    assert_eq!(listed, rows);
    mock.assert_async().await;
}

#[tokio::test]
async fn supabase_failure_is_a_persistence_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/rest/v1/review_insights")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("{\"message\":\"boom\"}")
        .create_async()
        .await;

    let err = supabase_for(&server)
        .upsert(&record("R1", 2025, 1, 1, Sentiment::Neutral))
        .await
        .unwrap_err();
    assert!(
        matches!(err, InsightsError::PersistenceError { status: Some(500), .. }),
        "{:?}",
        err
    );
}

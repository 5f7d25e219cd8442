use pretty_assertions::assert_eq;
use review_insights::prompt::{build_prompt, SYSTEM_PROMPT};
use review_insights::provider::DEFAULT_MODEL;
use review_insights::{ChatRole, CompletionParams, InsightsError, ReviewAnalyzer, Sentiment};
use std::sync::Arc;


use test_helpers::{fenced, sample_review, ScriptedProvider, MIXED_RESPONSE};

fn analyzer_with(provider: Arc<ScriptedProvider>) -> ReviewAnalyzer {
    ReviewAnalyzer::new(provider)
}

#[tokio::test]
async fn mixed_review_yields_two_ordered_insights() {
    let provider = Arc::new(ScriptedProvider::replying(MIXED_RESPONSE));
    let result = analyzer_with(provider.clone())
        .analyze(&sample_review())
        .await
        .unwrap();

    assert_eq!(result.review_id, "R1");
    assert_eq!(result.overall_sentiment, Sentiment::Neutral);
    assert_eq!(result.insights.len(), 2);
    assert_eq!(result.insights[0].topic, "delivery speed");
    assert_eq!(result.insights[0].sentiment, Sentiment::Positive);
    assert_eq!(result.insights[1].topic, "app stability");
    assert_eq!(result.insights[1].sentiment, Sentiment::Negative);
    assert_eq!(result.insights[1].problem.as_deref(), Some("app crashes often"));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn fenced_response_matches_unwrapped_response() {
    let review = sample_review();
    let plain = analyzer_with(Arc::new(ScriptedProvider::replying(MIXED_RESPONSE)))
        .analyze(&review)
        .await
        .unwrap();
    let wrapped = analyzer_with(Arc::new(ScriptedProvider::replying(fenced(MIXED_RESPONSE))))
        .analyze(&review)
        .await
        .unwrap();

    assert_eq!(plain, wrapped);
}

#[tokio::test]
async fn invented_sentiment_fails_with_schema_violation() {
    let provider = Arc::new(ScriptedProvider::replying(
        r#"{"overall_sentiment":"great","insights":[]}"#,
    ));
    let err = analyzer_with(provider).analyze(&sample_review()).await.unwrap_err();

    match err {
        InsightsError::AnalysisFailed { review_id, source } => {
            assert_eq!(review_id, "R1");
            assert!(
                matches!(
                    *source,
                    InsightsError::SchemaViolation { ref path, .. } if path == "overall_sentiment"
                ),
                "unexpected cause {:?}",
                source
            );
        }
        other => panic!("expected AnalysisFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_json_fails_with_malformed_response() {
    let provider = Arc::new(ScriptedProvider::replying("Sorry, I cannot help with that."));
    let err = analyzer_with(provider).analyze(&sample_review()).await.unwrap_err();
    assert_eq!(err.kind(), "analysis_failed");
    assert_eq!(err.cause().map(|c| c.kind()), Some("malformed_response"));
}

#[tokio::test]
async fn provider_failure_is_wrapped_without_retry() {
    let provider = Arc::new(ScriptedProvider::failing(InsightsError::rate_limited(
        "slow down",
        None,
    )));
    provider.push_text(MIXED_RESPONSE);

    let err = analyzer_with(provider.clone())
        .analyze(&sample_review())
        .await
        .unwrap_err();

    assert_eq!(err.cause().map(|c| c.kind()), Some("provider_error"));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn adversarial_identity_fields_are_overwritten() {
    let provider = Arc::new(ScriptedProvider::replying(
        r#"{"review_id":"SOMEONE-ELSE","rating":"5","original_text":"I am the model",
            "overall_sentiment":"negative","insights":[]}"#,
    ));
    let review = sample_review();
    let result = analyzer_with(provider).analyze(&review).await.unwrap();

    assert_eq!(result.review_id, review.review_id);
    assert_eq!(result.review_date, review.date);
    assert_eq!(result.rating, review.rating);
    assert_eq!(result.original_text, review.text);
}

#[tokio::test]
async fn provider_receives_built_prompt_and_pinned_params() {
    let provider = Arc::new(ScriptedProvider::replying(MIXED_RESPONSE));
    let review = sample_review();
    analyzer_with(provider.clone()).analyze(&review).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let (messages, params) = &requests[0];
    assert_eq!(messages, &build_prompt(&review.text));
    assert_eq!(messages[0].role, ChatRole::System);
    assert_eq!(messages[0].content, SYSTEM_PROMPT);
    assert_eq!(params.model, DEFAULT_MODEL);
    assert!(params.temperature <= 0.2);
    assert!(params.json_mode);
}

#[tokio::test]
async fn configured_params_reach_the_provider() {
    let provider = Arc::new(ScriptedProvider::replying(MIXED_RESPONSE));
    let params = CompletionParams::default().with_model("gpt-4o-mini");
    ReviewAnalyzer::new(provider.clone())
        .with_params(params.clone())
        .analyze(&sample_review())
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests[0].1, params);
    assert_eq!(requests[0].1.model, "gpt-4o-mini");
}

//! Strict validation of model output into an `AnalysisResult`.
//!
//! The model's JSON is parsed, the caller's identifying fields are written over
//! whatever the model produced for them, and the merged document is checked
//! field by field before it is turned into a typed record. Nothing is coerced:
//! an unknown sentiment, an empty-string `problem` or a missing key fails the
//! whole analysis with the path of the offending field.

use serde_json::{Map, Value};

use crate::schema::{AnalysisResult, ReviewInput, Sentiment};
use crate::types::{InsightsError, InsightsResult};

pub const FIELD_REVIEW_ID: &str = "review_id";
pub const FIELD_REVIEW_DATE: &str = "review_date";
pub const FIELD_RATING: &str = "rating";
pub const FIELD_ORIGINAL_TEXT: &str = "original_text";
pub const FIELD_OVERALL_SENTIMENT: &str = "overall_sentiment";
pub const FIELD_INSIGHTS: &str = "insights";

/// Parse `json_str`, merge in the identifying fields of `review`, and validate
/// the result against the `AnalysisResult` shape.
pub fn parse_and_validate(json_str: &str, review: &ReviewInput) -> InsightsResult<AnalysisResult> {
    let parsed: Value = serde_json::from_str(json_str).map_err(|e| {
        tracing::debug!(raw = %json_str, "LLM output is not valid JSON");
        InsightsError::malformed_response(e.to_string(), json_str)
    })?;

    let mut document = match parsed {
        Value::Object(map) => map,
        other => {
            return Err(InsightsError::schema_violation(
                "$",
                Some(&other),
                "expected a JSON object",
            ))
        }
    };

    inject_review_fields(&mut document, review)?;
    validate_document(&document)?;

    serde_json::from_value(Value::Object(document))
        .map_err(|e| InsightsError::schema_violation("$", None, e.to_string()))
}

/// Overwrite the caller-owned fields; the model never controls them
pub fn inject_review_fields(
    document: &mut Map<String, Value>,
    review: &ReviewInput,
) -> InsightsResult<()> {
    // Same serde representation the typed record reads back
    let date = serde_json::to_value(review.date).map_err(|e| {
        InsightsError::InvalidInput(format!("unserializable review date: {}", e))
    })?;
    document.insert(FIELD_REVIEW_ID.into(), Value::String(review.review_id.clone()));
    document.insert(FIELD_REVIEW_DATE.into(), date);
    document.insert(FIELD_RATING.into(), Value::String(review.rating.clone()));
    document.insert(FIELD_ORIGINAL_TEXT.into(), Value::String(review.text.clone()));
    Ok(())
}

fn validate_document(document: &Map<String, Value>) -> InsightsResult<()> {
    expect_sentiment(document.get(FIELD_OVERALL_SENTIMENT), FIELD_OVERALL_SENTIMENT)?;

    let insights = match document.get(FIELD_INSIGHTS) {
        Some(Value::Array(items)) => items,
        other => {
            return Err(InsightsError::schema_violation(
                FIELD_INSIGHTS,
                other,
                "expected a list of insights",
            ))
        }
    };

    for (index, item) in insights.iter().enumerate() {
        validate_insight(item, &format!("{}[{}]", FIELD_INSIGHTS, index))?;
    }
    Ok(())
}

fn validate_insight(item: &Value, path: &str) -> InsightsResult<()> {
    let insight = item.as_object().ok_or_else(|| {
        InsightsError::schema_violation(path, Some(item), "expected an insight object")
    })?;

    expect_sentiment(insight.get("sentiment"), &format!("{}.sentiment", path))?;

    let topic_path = format!("{}.topic", path);
    match insight.get("topic") {
        Some(Value::String(topic)) if !topic.trim().is_empty() => {}
        Some(Value::String(_)) => {
            return Err(InsightsError::schema_violation(
                topic_path,
                insight.get("topic"),
                "topic cannot be empty",
            ))
        }
        other => {
            return Err(InsightsError::schema_violation(
                topic_path,
                other,
                "expected a string",
            ))
        }
    }

    expect_text_or_null(insight.get("problem"), &format!("{}.problem", path))?;
    expect_text_or_null(insight.get("suggestion"), &format!("{}.suggestion", path))?;
    Ok(())
}

fn expect_sentiment(value: Option<&Value>, path: &str) -> InsightsResult<Sentiment> {
    match value {
        Some(Value::String(label)) => label.parse::<Sentiment>().map_err(|_| {
            InsightsError::schema_violation(
                path,
                value,
                "sentiment must be one of \"positive\", \"negative\", \"neutral\"",
            )
        }),
        other => Err(InsightsError::schema_violation(
            path,
            other,
            "expected a sentiment string",
        )),
    }
}

/// `problem` and `suggestion` must be present and be either an explicit null or
/// a string with non-whitespace content, the same rule `topic` follows.
fn expect_text_or_null(value: Option<&Value>, path: &str) -> InsightsResult<()> {
    match value {
        Some(Value::Null) => Ok(()),
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(()),
        Some(Value::String(_)) => Err(InsightsError::schema_violation(
            path,
            value,
            "blank string is not a substitute for null",
        )),
        other => Err(InsightsError::schema_violation(
            path,
            other,
            "expected a string or null",
        )),
    }
}

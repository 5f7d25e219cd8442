// Core types and errors

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The result type used throughout the crate
pub type InsightsResult<T> = Result<T, InsightsError>;

/// Longest slice of a raw model response kept inside an error
pub const SNIPPET_LIMIT: usize = 200;

/// A secure container for credentials that zeroes its memory when dropped
pub struct SecureApiKey {
    key: String,
}

impl SecureApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl Deref for SecureApiKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.key
    }
}

impl Drop for SecureApiKey {
    fn drop(&mut self) {
        // Zero bytes keep the buffer valid UTF-8
        unsafe {
            let bytes = self.key.as_bytes_mut();
            bytes.iter_mut().for_each(|b| *b = 0);
        }
    }
}

impl fmt::Debug for SecureApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureApiKey([REDACTED])")
    }
}

impl fmt::Display for SecureApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED API KEY]")
    }
}

impl Clone for SecureApiKey {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum InsightsError {
    #[error("LLM provider call failed: {message}")]
    ProviderError {
        message: String,
        status: Option<u16>,
        retry_after: Option<Duration>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid JSON received from LLM: {message}")]
    MalformedResponse {
        message: String,
        /// Offending text, truncated to `SNIPPET_LIMIT` characters
        snippet: String,
    },

    #[error("LLM response validation failed at `{path}`: {message} (got {value})")]
    SchemaViolation {
        path: String,
        value: String,
        message: String,
    },

    #[error("Failed to analyze review {review_id}: {source}")]
    AnalysisFailed {
        review_id: String,
        source: Box<InsightsError>,
    },

    #[error("Persistence operation failed: {message}")]
    PersistenceError {
        message: String,
        status: Option<u16>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Review analysis not found: {review_id}")]
    NotFound { review_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl InsightsError {
    pub fn provider_error<T: Into<String>>(
        message: T,
        status: Option<u16>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let error = Self::ProviderError {
            message: message.into(),
            status,
            retry_after: None,
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };
        tracing::error!(status = ?status, "{}", error);
        error
    }

    pub fn rate_limited(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        let error = Self::ProviderError {
            message: message.into(),
            status: Some(429),
            retry_after,
            source: None,
        };
        tracing::error!(retry_after = ?retry_after, "{}", error);
        error
    }

    pub fn malformed_response(message: impl Into<String>, raw: &str) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            snippet: truncate_snippet(raw),
        }
    }

    pub fn schema_violation(
        path: impl Into<String>,
        value: Option<&serde_json::Value>,
        message: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            path: path.into(),
            value: value
                .map(|v| truncate_snippet(&v.to_string()))
                .unwrap_or_else(|| "<missing>".to_string()),
            message: message.into(),
        }
    }

    pub fn analysis_failed(review_id: impl Into<String>, cause: InsightsError) -> Self {
        Self::AnalysisFailed {
            review_id: review_id.into(),
            source: Box::new(cause),
        }
    }

    pub fn persistence_error<T: Into<String>>(
        message: T,
        status: Option<u16>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let error = Self::PersistenceError {
            message: message.into(),
            status,
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };
        tracing::error!(status = ?status, "{}", error);
        error
    }

    pub fn simple_provider_error<T: Into<String>>(message: T) -> Self {
        Self::provider_error(message, None, None::<reqwest::Error>)
    }

    /// Short stable name of the variant, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProviderError { .. } => "provider_error",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::SchemaViolation { .. } => "schema_violation",
            Self::AnalysisFailed { .. } => "analysis_failed",
            Self::PersistenceError { .. } => "persistence_error",
            Self::NotFound { .. } => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::ConfigError(_) => "config_error",
            Self::ServerError(_) => "server_error",
        }
    }

    /// The wrapped cause of an `AnalysisFailed`, or `None` for other variants
    pub fn cause(&self) -> Option<&InsightsError> {
        match self {
            Self::AnalysisFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Cut `raw` down to `SNIPPET_LIMIT` characters without splitting a code point
pub fn truncate_snippet(raw: &str) -> String {
    match raw.char_indices().nth(SNIPPET_LIMIT) {
        Some((idx, _)) => format!("{}...", &raw[..idx]),
        None => raw.to_string(),
    }
}

lazy_static! {
    static ref SECRET_PATTERN: Regex = Regex::new(r"[A-Za-z0-9_-]{20,}").unwrap();
}

/// Redact long token-like strings so credentials never leak through error messages
pub fn sanitize_error_message(message: &str) -> String {
    SECRET_PATTERN.replace_all(message, "[REDACTED]").into_owned()
}

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_snippet_respects_char_boundaries() {
        let raw = "é".repeat(SNIPPET_LIMIT + 10);
        let snippet = truncate_snippet(&raw);
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), SNIPPET_LIMIT + 3);

        assert_eq!(truncate_snippet("short"), "short");
    }

    #[test]
    fn analysis_failed_exposes_cause() {
        let err = InsightsError::analysis_failed(
            "R1",
            InsightsError::schema_violation(
                "overall_sentiment",
                Some(&serde_json::json!("great")),
                "bad",
            ),
        );
        assert_eq!(err.kind(), "analysis_failed");
        assert_eq!(err.cause().map(|c| c.kind()), Some("schema_violation"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn secure_key_is_redacted() {
        let key = SecureApiKey::new("sk-very-secret");
        assert_eq!(format!("{:?}", key), "SecureApiKey([REDACTED])");
        assert_eq!(key.to_string(), "[REDACTED API KEY]");
        assert_eq!(key.as_str(), "sk-very-secret");
    }
}

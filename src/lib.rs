//! # review-insights: structured insights from customer reviews
//!
//! An HTTP service that sends a customer review to a chat LLM, validates the
//! model's JSON strictly against a fixed schema, and stores the result.
//!
//! ## Pipeline
//!
//! - [`prompt::build_prompt`] builds a fixed few-shot conversation
//! - a [`CompletionProvider`] turns it into raw text
//! - [`utils::json_extractor::extract_json`] strips a ```` ```json ```` fence
//! - [`validator::parse_and_validate`] produces an [`AnalysisResult`] or a
//!   classified error
//!
//! [`ReviewAnalyzer`] runs those steps and wraps any failure in
//! [`InsightsError::AnalysisFailed`].
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use review_insights::{OpenAiClient, ReviewAnalyzer, ReviewInput, SecureApiKey};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiClient::new(SecureApiKey::new(std::env::var("OPENAI_API_KEY")?))?;
//!     let analyzer = ReviewAnalyzer::new(Arc::new(provider));
//!
//!     let review = ReviewInput::new(
//!         "R1",
//!         NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         "4",
//!         "Fast delivery but app crashes often.",
//!     );
//!     let result = analyzer.analyze(&review).await?;
//!     println!("{} insights, overall {}", result.insights.len(), result.overall_sentiment);
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod schema;
pub mod prompt;
pub mod utils;
pub mod validator;
pub mod provider;
pub mod analyzer;
pub mod store;
pub mod config;
pub mod logging;
pub mod server;

pub use analyzer::ReviewAnalyzer;
pub use config::Config;
pub use provider::{CompletionParams, CompletionProvider, OpenAiClient};
pub use schema::{AnalysisResult, Insight, ReviewInput, Sentiment};
pub use store::{MemoryStore, ReviewStore, SupabaseStore};
pub use types::{
    sanitize_error_message, ChatMessage, ChatRole, InsightsError, InsightsResult, SecureApiKey,
};

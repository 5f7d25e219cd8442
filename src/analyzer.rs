//! Review analysis pipeline.
//!
//! `ReviewAnalyzer::analyze` runs prompt building, one completion call, fence
//! stripping and strict validation in that order. The first failure aborts the
//! run and is returned as `AnalysisFailed` carrying the specific cause. There
//! are no retries and no partial results.

use std::sync::Arc;

use crate::prompt::{build_prompt, PROMPT_VERSION};
use crate::provider::{CompletionParams, CompletionProvider};
use crate::schema::{AnalysisResult, ReviewInput};
use crate::types::{InsightsError, InsightsResult};
use crate::utils::json_extractor::extract_json;
use crate::validator::parse_and_validate;

#[derive(Clone)]
pub struct ReviewAnalyzer {
    provider: Arc<dyn CompletionProvider>,
    params: CompletionParams,
}

impl ReviewAnalyzer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            params: CompletionParams::default(),
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    /// Analyse one review
    pub async fn analyze(&self, review: &ReviewInput) -> InsightsResult<AnalysisResult> {
        tracing::info!(
            review_id = %review.review_id,
            model = %self.params.model,
            provider = self.provider.name(),
            prompt_version = PROMPT_VERSION,
            "Analyzing review"
        );

        match self.run(review).await {
            Ok(result) => {
                tracing::info!(
                    review_id = %review.review_id,
                    overall_sentiment = %result.overall_sentiment,
                    insights = result.insights.len(),
                    "Successfully analyzed review"
                );
                Ok(result)
            }
            Err(cause) => {
                tracing::error!(
                    review_id = %review.review_id,
                    kind = cause.kind(),
                    error = %cause,
                    "LLM analysis failed"
                );
                Err(InsightsError::analysis_failed(review.review_id.clone(), cause))
            }
        }
    }

    async fn run(&self, review: &ReviewInput) -> InsightsResult<AnalysisResult> {
        let messages = build_prompt(&review.text);
        let raw = self.provider.complete(&messages, &self.params).await?;
        let json_str = extract_json(&raw);
        parse_and_validate(&json_str, review)
    }
}

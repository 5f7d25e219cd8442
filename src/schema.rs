//! Review and analysis records.
//!
//! `ReviewInput` is what the HTTP layer receives; `AnalysisResult` is what the
//! pipeline produces and the store persists. Sentiment labels are the three
//! lowercase strings `positive`, `negative` and `neutral`, compared exactly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{InsightsError, InsightsResult};
use crate::utils::StringValidator;

/// Raw customer review as received from a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewInput {
    /// Unique identifier for the review
    pub review_id: String,
    /// Date the review was posted
    pub date: NaiveDate,
    /// Free-form rating, e.g. "★★★★☆ (4 stars)" or "4"
    pub rating: String,
    /// Full text of the review
    pub text: String,
}

impl ReviewInput {
    pub fn new(
        review_id: impl Into<String>,
        date: NaiveDate,
        rating: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            date,
            rating: rating.into(),
            text: text.into(),
        }
    }

    /// Reject inputs the pipeline cannot meaningfully analyse
    pub fn validate(&self) -> InsightsResult<()> {
        StringValidator::not_blank(&self.review_id, "review_id")?;
        StringValidator::not_blank(&self.text, "text")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = InsightsError;

    /// Case-sensitive: "Positive" is not a sentiment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str() == s)
            .ok_or_else(|| {
                InsightsError::InvalidInput(format!(
                    "sentiment must be one of positive, negative, neutral; got {:?}",
                    s
                ))
            })
    }
}

/// One topic-scoped judgment extracted from a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub sentiment: Sentiment,
    pub topic: String,
    pub problem: Option<String>,
    pub suggestion: Option<String>,
}

/// Full analysis of one review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub review_id: String,
    pub review_date: NaiveDate,
    pub rating: String,
    pub original_text: String,
    pub overall_sentiment: Sentiment,
    pub insights: Vec<Insight>,
}

//! Prompt construction for review analysis.
//!
//! `build_prompt` assembles a fixed conversation: the system instruction, the
//! few-shot exchanges from [`few_shot`], then the review under analysis. The
//! output depends on nothing but the review text.

pub mod few_shot;

pub use few_shot::{FewShotExample, FEW_SHOT_EXAMPLES};

use crate::types::ChatMessage;

/// Bumped whenever `SYSTEM_PROMPT` or the fixtures change meaning
pub const PROMPT_VERSION: &str = "review-insights/v1";

pub const SYSTEM_PROMPT: &str = r#"You are an expert AI analyst specialized in extracting structured insights from customer reviews.
Your task is to analyze the given review and output a JSON object with an overall sentiment and a list of insights.

CRITICAL INSTRUCTIONS:
1. Be precise and objective. Do not invent or add information that is not present in the review.
2. For the overall_sentiment, consider the entire review holistically.
3. Break the review down into distinct insights. Each insight must be about exactly one specific topic (e.g. 'discount', 'delivery', 'app UI').
4. For each insight you MUST populate 'sentiment', 'topic', 'problem' and 'suggestion'.
5. 'sentiment' and 'overall_sentiment' MUST be exactly one of: "positive", "negative", "neutral" (lowercase).
6. If a 'problem' or 'suggestion' is not explicitly stated, you MUST set that field to null. Never omit it and never use an empty string.
7. Your final output MUST be a valid JSON object that matches this exact schema:
{
  "overall_sentiment": "string",
  "insights": [
    {
      "sentiment": "string",
      "topic": "string",
      "problem": "string | null",
      "suggestion": "string | null"
    }
  ]
}
"#;

/// Render review text as the content of a user turn
pub fn review_message(review_text: &str) -> String {
    format!("text: \"{}\"", review_text)
}

/// Build the full conversation for analysing `review_text`
pub fn build_prompt(review_text: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + FEW_SHOT_EXAMPLES.len() * 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));

    for example in FEW_SHOT_EXAMPLES {
        messages.push(ChatMessage::user(review_message(example.review_text)));
        messages.push(ChatMessage::assistant(example.expected_json));
    }

    messages.push(ChatMessage::user(review_message(review_text)));
    messages
}

//! Few-shot fixtures embedded in every analysis prompt.
//!
//! These are literal demonstrations of the expected output. They are never
//! parameterised by the request being analysed.

/// One demonstration exchange: a review and the analysis we expect for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FewShotExample {
    pub review_text: &'static str,
    pub expected_json: &'static str,
}

pub static FEW_SHOT_EXAMPLES: &[FewShotExample] = &[
    // Mixed: one praised topic, one complaint with a suggestion
    FewShotExample {
        review_text: "I love the discount program in this app - saved 30% on my last order! However, the search functionality is really frustrating. Results are rarely relevant to what I'm looking for. They should implement category filters and improve their search algorithm.",
        expected_json: r#"{
  "overall_sentiment": "neutral",
  "insights": [
    {
      "sentiment": "positive",
      "topic": "discount program",
      "problem": null,
      "suggestion": null
    },
    {
      "sentiment": "negative",
      "topic": "search functionality",
      "problem": "Results are rarely relevant",
      "suggestion": "implement category filters and improve their search algorithm"
    }
  ]
}"#,
    },
    // Purely positive
    FewShotExample {
        review_text: "Delivery was super fast and the rider was polite. The food was hot and fresh. Best experience so far!",
        expected_json: r#"{
  "overall_sentiment": "positive",
  "insights": [
    {
      "sentiment": "positive",
      "topic": "delivery speed",
      "problem": null,
      "suggestion": null
    },
    {
      "sentiment": "positive",
      "topic": "rider politeness",
      "problem": null,
      "suggestion": null
    },
    {
      "sentiment": "positive",
      "topic": "food quality",
      "problem": null,
      "suggestion": null
    }
  ]
}"#,
    },
];

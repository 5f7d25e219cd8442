//! LLM completion providers.
//!
//! The analyzer only needs one capability from a model vendor: turn an ordered
//! list of chat messages into a blob of text. `CompletionProvider` is that seam.
//! [`openai::OpenAiClient`] is the production implementation; tests plug in
//! scripted providers.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::types::{ChatMessage, InsightsError, InsightsResult};
use crate::utils::validate_range;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Sampling parameters for one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider to constrain its output to a JSON object
    pub json_mode: bool,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            json_mode: true,
        }
    }
}

impl CompletionParams {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> InsightsResult<Self> {
        self.temperature = validate_range(temperature, 0.0, 2.0, "temperature")?;
        Ok(self)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> InsightsResult<Self> {
        if max_tokens == 0 {
            return Err(InsightsError::InvalidInput("max_tokens must be greater than 0".into()));
        }
        self.max_tokens = max_tokens;
        Ok(self)
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `messages` to the model and return the raw text it produced
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> InsightsResult<String>;

    /// Name used in logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_near_deterministic_json() {
        let params = CompletionParams::default();
        assert_eq!(params.model, DEFAULT_MODEL);
        assert!(params.temperature <= 0.2);
        assert_eq!(params.max_tokens, 1000);
        assert!(params.json_mode);
    }

    #[test]
    fn params_are_validated() {
        assert!(CompletionParams::default().with_temperature(2.5).is_err());
        assert!(CompletionParams::default().with_temperature(-0.1).is_err());
        assert!(CompletionParams::default().with_max_tokens(0).is_err());
        let params = CompletionParams::default()
            .with_model("gpt-4o-mini")
            .with_temperature(0.0)
            .unwrap();
        assert_eq!(params.model, "gpt-4o-mini");
        assert_eq!(params.temperature, 0.0);
    }
}

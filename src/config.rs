//! Process configuration loaded once at startup.
//!
//! Values come from the environment, optionally seeded from a `.env` file.
//! Missing credentials and endpoints are only warned about: the service still
//! starts, and the affected calls fail (provider) or fall back to the
//! in-memory store (persistence).

use std::net::SocketAddr;
use std::time::Duration;

use crate::provider::openai::DEFAULT_BASE_URL;
use crate::provider::{CompletionParams, DEFAULT_MODEL};
use crate::types::{InsightsError, InsightsResult, SecureApiKey};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";
pub const FRONT_END_URL: &str = "FRONT_END_URL";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<SecureApiKey>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<SecureApiKey>,
    pub front_end_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub llm_timeout: Duration,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> InsightsResult<Self> {
        // A missing .env is normal in deployed environments
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> InsightsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get(BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| {
            InsightsError::ConfigError(format!(
                "{} {:?} is not a socket address: {}",
                BIND_ADDR, bind_raw, e
            ))
        })?;

        let llm_timeout_secs = match get(LLM_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    "{} is not a number, using {}s",
                    LLM_TIMEOUT_SECS,
                    DEFAULT_LLM_TIMEOUT_SECS
                );
                DEFAULT_LLM_TIMEOUT_SECS
            }),
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let config = Self {
            openai_api_key: get(OPENAI_API_KEY).map(SecureApiKey::new),
            openai_base_url: get(OPENAI_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: get(OPENAI_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            supabase_url: get(SUPABASE_URL),
            supabase_service_key: get(SUPABASE_SERVICE_KEY).map(SecureApiKey::new),
            front_end_url: get(FRONT_END_URL),
            bind_addr,
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            log_level: get(LOG_LEVEL).unwrap_or_else(|| "info".to_string()),
            log_format: get(LOG_FORMAT).unwrap_or_else(|| "pretty".to_string()),
        };

        Ok(config)
    }

    /// Names of the settings that were not provided
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.is_none() {
            missing.push(OPENAI_API_KEY);
        }
        if self.supabase_url.is_none() {
            missing.push(SUPABASE_URL);
        }
        if self.supabase_service_key.is_none() {
            missing.push(SUPABASE_SERVICE_KEY);
        }
        if self.front_end_url.is_none() {
            missing.push(FRONT_END_URL);
        }
        missing
    }

    /// Log one warning per missing setting. Call after logging is initialised.
    pub fn warn_missing(&self) {
        for key in self.missing_keys() {
            tracing::warn!("{} not set. Please add it to your .env file", key);
        }
    }

    /// Sampling parameters for analysis calls, with the configured model
    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams::default().with_model(self.openai_model.clone())
    }

    /// Supabase endpoint and credential, when both are configured
    pub fn supabase(&self) -> Option<(&str, &SecureApiKey)> {
        match (&self.supabase_url, &self.supabase_service_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key)),
            _ => None,
        }
    }
}

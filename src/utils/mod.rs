// Utility functions

pub mod json_extractor;

use crate::types::*;

/// Validates a value against a constraint and returns an error if it fails
pub fn validate<T, F>(
    value: T,
    constraint: F,
    error_message: impl Into<String>,
) -> InsightsResult<T>
where
    F: FnOnce(&T) -> bool,
{
    if constraint(&value) {
        Ok(value)
    } else {
        Err(InsightsError::InvalidInput(error_message.into()))
    }
}

/// Validates a range constraint for numeric values
pub fn validate_range<T>(value: T, min: T, max: T, param_name: &str) -> InsightsResult<T>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    validate(
        value,
        |&v| v >= min && v <= max,
        format!("{} must be between {} and {}, but got {}", param_name, min, max, value),
    )
}

/// Validates strings against common constraints
pub struct StringValidator;

impl StringValidator {
    /// Validates that a string contains something other than whitespace
    pub fn not_blank<'a>(value: &'a str, param_name: &str) -> InsightsResult<&'a str> {
        validate(
            value,
            |s| !s.trim().is_empty(),
            format!("{} cannot be empty", param_name),
        )
    }
}

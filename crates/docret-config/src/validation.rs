//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implement this for any config type that needs validation beyond
/// type-level checks. Errors should name the offending field.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Helper function to validate value is within range
pub fn validate_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Helper function to validate integer is above minimum
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// Helper for service endpoints
pub fn validate_url(field: impl Into<String>, url: &str) -> Result<()> {
    let field = field.into();
    if url.is_empty() {
        return Err(ConfigError::invalid(field, "URL cannot be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::invalid(
            field,
            format!("URL must start with http:// or https://, got: {}", url),
        ));
    }
    Ok(())
}

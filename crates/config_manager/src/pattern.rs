//! Compilation and matching of administrator-supplied regular expressions.
//!
//! Patterns come from configuration forms and are untrusted. Compilation
//! failures are returned as [`ConfigurationError::InvalidPattern`] tagged with
//! the field the pattern came from, never as panics. The `regex` engine runs
//! in linear time; the compiled program size is capped so an enormous
//! pattern cannot exhaust memory.

use regex::{Regex, RegexBuilder};

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::settings::SettingField;

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;

/// Upper bound for the compiled size of a single pattern.
pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A compiled setting pattern.
///
/// An empty pattern compiles to [`CompiledPattern::Disabled`]: it never
/// matches anything, and rules built on it impose no constraint.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Disabled,
    Active(Regex),
}

impl CompiledPattern {
    /// Whether a rule should be applied for this pattern.
    pub fn is_enabled(&self) -> bool {
        matches!(self, CompiledPattern::Active(_))
    }

    /// Search for the pattern anywhere in `text`.
    ///
    /// This is a substring search; anchoring happens only when the pattern
    /// itself uses `^` or `$`. A disabled pattern never matches.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            CompiledPattern::Disabled => false,
            CompiledPattern::Active(regex) => regex.is_match(text),
        }
    }

    /// The source text of an active pattern.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CompiledPattern::Disabled => None,
            CompiledPattern::Active(regex) => Some(regex.as_str()),
        }
    }
}

/// Compiles setting patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl PatternMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Compile the pattern configured for `field`.
    ///
    /// # Errors
    /// Returns `ConfigurationError::InvalidPattern` when the pattern does not
    /// compile or exceeds [`PATTERN_SIZE_LIMIT`].
    pub fn compile(&self, field: SettingField, pattern: &str) -> ConfigurationResult<CompiledPattern> {
        if pattern.trim().is_empty() {
            return Ok(CompiledPattern::Disabled);
        }

        RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map(CompiledPattern::Active)
            .map_err(|e| ConfigurationError::InvalidPattern {
                field,
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Compile an optional pattern; an unset pattern is disabled.
    pub fn compile_optional(
        &self,
        field: SettingField,
        pattern: Option<&str>,
    ) -> ConfigurationResult<CompiledPattern> {
        match pattern {
            Some(pattern) => self.compile(field, pattern),
            None => Ok(CompiledPattern::Disabled),
        }
    }
}

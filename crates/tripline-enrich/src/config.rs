//! Enrichment configuration

use std::time::Duration;

/// Timing and gating parameters for debounced enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichConfig {
    /// How long input must be stable before extraction fires
    pub debounce: Duration,
    /// Inputs shorter than this (trimmed) never trigger extraction
    pub min_input_len: usize,
}

impl EnrichConfig {
    /// Defaults: 1500 ms debounce, 3-character minimum
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            debounce: Duration::from_millis(1500),
            min_input_len: 3,
        }
    }

    /// Set the debounce delay
    #[inline]
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the minimum input length
    #[inline]
    #[must_use]
    pub fn with_min_input_len(mut self, min_input_len: usize) -> Self {
        self.min_input_len = min_input_len;
        self
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self::new()
    }
}

use thiserror::Error;

use crate::TimeWindow;

/// Page size requested when nothing else is configured.
pub const DEFAULT_MAX_RESULTS: u32 = 20;
/// Largest page the backend will return.
pub const MAX_RESULTS_CAP: u32 = 100;

/// Validated, immutable parameters for one search attempt.
///
/// Only [`InputValidator::validate`] builds these, so `topic` is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    topic: String,
    window: TimeWindow,
    max_results: u32,
}

impl SearchQuery {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a topic to search")]
    EmptyTopic,
}

/// Turns raw user input into a [`SearchQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputValidator {
    max_results: u32,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl InputValidator {
    /// `max_results` is clamped to `1..=MAX_RESULTS_CAP`.
    pub fn new(max_results: u32) -> Self {
        Self {
            max_results: max_results.clamp(1, MAX_RESULTS_CAP),
        }
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn validate(
        &self,
        raw_topic: &str,
        window: TimeWindow,
    ) -> Result<SearchQuery, ValidationError> {
        let topic = raw_topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        Ok(SearchQuery {
            topic: topic.to_string(),
            window,
            max_results: self.max_results,
        })
    }
}

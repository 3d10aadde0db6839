use std::{sync::LazyLock, time::{Duration, Instant}};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static ZIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{5}").expect("valid ZIP pattern"));

/// Lookup key for a free-text search: the first run of five ASCII digits, else the
/// trimmed input. Empty input yields None.
pub fn extract_search_key(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(ZIP_PATTERN.find(trimmed).map_or(trimmed, |m| m.as_str()).to_string())
}

/// Bounded linear backoff for programmatic searches that arrive before the
/// boundary layer is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
    pub base_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { base_delay_ms: 200, max_attempts: 10 }
    }
}

impl RetryPolicy {
    #[inline] pub fn base_delay(&self) -> Duration { Duration::from_millis(self.base_delay_ms) }

    /// Delay scheduled after the given (1-based) attempt fails.
    #[inline] pub fn delay_after(&self, attempt: u32) -> Duration { self.base_delay() * attempt }
}

/// A search waiting for its next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub code: String,
    /// Number of the attempt that will run next, starting at 1.
    pub attempt: u32,
    pub due: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("empty search query")]
    EmptyQuery,
    #[error("ZCTA {code} not found after {attempts} attempts")]
    NotFound { code: String, attempts: u32 },
}

/// Where a programmatic search stands after an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Highlighted { code: String, attempts: u32 },
    Pending { code: String, next_attempt: u32, retry_at: Instant },
    Failed(SearchError),
}

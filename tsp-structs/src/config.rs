use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKER_PREFIX: &str = "TSPWorker";
pub const DEFAULT_MAX_CITIES: usize = 13;

/// Master settings. Every field is optional in the JSON file and falls back to
/// the value from [`MasterConfig::default`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MasterConfig {
    /// Registry names are matched against `"<worker_prefix>-"`.
    pub worker_prefix: String,
    /// Largest instance the exhaustive search accepts.
    pub max_cities: usize,
    /// Deadline for a single sub-problem call, in milliseconds.
    pub call_timeout_ms: u64,
    /// Attempts per sub-problem, counting the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Base delay before a retry; doubles on every further attempt.
    pub backoff_ms: u64,
    /// Solve a sub-problem in-process once every remote attempt has failed.
    pub local_fallback: bool,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            worker_prefix: DEFAULT_WORKER_PREFIX.to_string(),
            max_cities: DEFAULT_MAX_CITIES,
            call_timeout_ms: 300_000,
            max_attempts: 3,
            backoff_ms: 250,
            local_fallback: false,
        }
    }
}

impl MasterConfig {
    pub fn name_filter(&self) -> String {
        format!("{}-", self.worker_prefix)
    }
}

//! Summary of a successful initialization run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a successful `App::init()` ran.
///
/// A failed run returns `RunError` instead; there is no partial summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of groups executed (all of them, on success).
    pub groups: usize,
    /// Number of initializers executed.
    pub tasks: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn elapsed_ms(&self) -> u64 {
        (self.finished_at - self.started_at).num_milliseconds().max(0) as u64
    }
}

//! State - 初期化ランの状態遷移
//!
//! ```text
//! Idle → Running(0) → Running(1) → … → Succeeded
//!              └──────────┴──────────→ Failed
//! ```
//! Succeeded / Failed は終端状態で、リトライ遷移はありません。

use serde::{Deserialize, Serialize};

/// Driver state of one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum RunState {
    #[default]
    Idle,
    Running { group: usize },
    Succeeded,
    /// Index of the group that failed. The error itself is not kept here;
    /// it is the `Err(RunError)` returned by `GroupedScheduler::run`.
    Failed { group: usize },
}

impl RunState {
    /// State entered when a run starts with `group_count` groups.
    pub fn start(group_count: usize) -> Self {
        if group_count == 0 {
            RunState::Succeeded
        } else {
            RunState::Running { group: 0 }
        }
    }

    /// Transition out of `Running { group }` once that group has joined.
    ///
    /// Terminal states and `Idle` are returned unchanged.
    pub fn after_group(self, group_count: usize, group_ok: bool) -> Self {
        match self {
            RunState::Running { group } if !group_ok => RunState::Failed { group },
            RunState::Running { group } if group + 1 >= group_count => RunState::Succeeded,
            RunState::Running { group } => RunState::Running { group: group + 1 },
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed { .. })
    }
}

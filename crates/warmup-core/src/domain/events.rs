//! Events - 初期化イベント
//!
//! スケジューラは `EventSink` 経由でこれらのイベントを通知します。
//! ログ出力そのものは sink 側の責務です。

use serde::Serialize;

use super::order::OrderKey;

/// Observable event emitted by the scheduler during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InitEvent {
    RunStarted {
        groups: usize,
        tasks: usize,
    },
    TaskStarted {
        initializer: String,
        order: OrderKey,
    },
    TaskSucceeded {
        initializer: String,
        order: OrderKey,
        elapsed_ms: u64,
    },
    TaskFailed {
        initializer: String,
        order: OrderKey,
        error: String,
    },
    RunSucceeded {
        elapsed_ms: u64,
    },
    RunFailed {
        error: String,
    },
}

impl InitEvent {
    /// Initializer name for task-level events.
    pub fn initializer(&self) -> Option<&str> {
        match self {
            InitEvent::TaskStarted { initializer, .. }
            | InitEvent::TaskSucceeded { initializer, .. }
            | InitEvent::TaskFailed { initializer, .. } => Some(initializer),
            _ => None,
        }
    }
}

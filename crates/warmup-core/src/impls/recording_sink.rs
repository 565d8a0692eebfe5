//! RecordingEventSink - イベントをメモリに記録する sink（テスト・診断用）

use std::sync::{Mutex, PoisonError};

use crate::domain::InitEvent;
use crate::ports::EventSink;

/// Keeps every emitted event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<InitEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<InitEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Position of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&InitEvent) -> bool) -> Option<usize> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .position(pred)
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: InitEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: InitEvent) {}
}

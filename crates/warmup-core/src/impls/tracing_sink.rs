//! TracingEventSink - イベントを tracing に流すデフォルトの sink

use tracing::{error, info};

use crate::domain::InitEvent;
use crate::ports::EventSink;

/// Default sink: one structured `tracing` record per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: InitEvent) {
        match event {
            InitEvent::RunStarted { groups, tasks } => {
                info!(groups, tasks, "starting async initialization");
            }
            InitEvent::TaskStarted { initializer, order } => {
                info!(%initializer, %order, "starting async initialization for initializer");
            }
            InitEvent::TaskSucceeded {
                initializer,
                order,
                elapsed_ms,
            } => {
                info!(%initializer, %order, elapsed_ms, "async initialization for initializer completed");
            }
            InitEvent::TaskFailed {
                initializer,
                order,
                error,
            } => {
                error!(%initializer, %order, %error, "async initialization for initializer failed");
            }
            InitEvent::RunSucceeded { elapsed_ms } => {
                info!(elapsed_ms, "async initialization completed");
            }
            InitEvent::RunFailed { error } => {
                error!(%error, "async initialization failed");
            }
        }
    }
}

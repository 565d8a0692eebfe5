//! EventSink port - 初期化イベントの通知先
//!
//! - `TracingEventSink`: tracing へ出力（デフォルト）
//! - `RecordingEventSink`: メモリに記録（テスト・診断用）
//! - `NoopEventSink`: 何もしない

use crate::domain::InitEvent;

/// Receives per-task and run-level events from the scheduler.
///
/// `emit` is called from the spawned task of each initializer, so it must
/// be cheap and must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: InitEvent);
}

//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **FnInitializer**: クロージャを Initializer として使う
//! - **TracingEventSink**: tracing へ出力（デフォルト）
//! - **RecordingEventSink** / **NoopEventSink**: テスト・診断用

pub mod delegate;
pub mod recording_sink;
pub mod tracing_sink;

pub use self::delegate::FnInitializer;
pub use self::recording_sink::{NoopEventSink, RecordingEventSink};
pub use self::tracing_sink::TracingEventSink;

//! Ports - 抽象化レイヤー
//!
//! スケジューラが依存する trait のみを定義します。
//! 実装は `impls` にあります。

pub mod event_sink;
pub mod initializer;

pub use self::event_sink::EventSink;
pub use self::initializer::Initializer;

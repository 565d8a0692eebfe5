//! warmup-core
//!
//! Ordered, grouped startup initialization.
//!
//! Initializers are registered with an order key. Initializers sharing a
//! key run concurrently; groups run one after another in ascending key
//! order, and the first failing group stops the run.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（order, errors, state, events, summary）
//! - **ports**: 抽象化レイヤー（Initializer, EventSink）
//! - **app**: アプリケーションロジック（registry, grouping, scheduler, builder）
//! - **impls**: 実装（FnInitializer, TracingEventSink, RecordingEventSink）
//! - **config** / **observability**: ログ設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{
    App, AppBuilder, BuildError, GroupedScheduler, InitializerRegistry, ParallelBatch, RegistryError,
};
pub use domain::{InitEvent, OrderKey, RunError, RunState, RunSummary, TaskError};
pub use ports::{EventSink, Initializer};

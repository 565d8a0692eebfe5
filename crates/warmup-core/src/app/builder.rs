//! AppBuilder - 起動時初期化のワイヤリング
//!
//! # 学習ポイント
//! - Builder パターン
//! - 初期化サービス未登録の検出（Fail-fast 設計）
//! - 登録エラーは build() でまとめて返す

use std::future::Future;
use std::sync::Arc;

use crate::domain::{OrderKey, RunError, RunSummary, TaskError};
use crate::impls::TracingEventSink;
use crate::ports::{EventSink, Initializer};

use super::registry::{InitializerRegistry, ParallelBatch, RegistryError};
use super::scheduler::GroupedScheduler;

/// Error raised when the builder cannot produce an `App`.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// AppBuilder はアプリケーションの初期化設定を組み立てる
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .add_initializer(LoadConfig::default())
///     .add_parallel(|batch| {
///         batch.add(Database::new(url)).add(Cache::new());
///     })
///     .build()?;
///
/// app.init().await?;
/// ```
///
/// Adding any initializer enables the initialization service;
/// `enable_initialization()` enables it with no initializers at all.
/// The first registration error is kept and returned by `build()`.
pub struct AppBuilder {
    registry: InitializerRegistry,
    initialization_enabled: bool,
    sink: Option<Arc<dyn EventSink>>,
    error: Option<RegistryError>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            registry: InitializerRegistry::new(),
            initialization_enabled: false,
            sink: None,
            error: None,
        }
    }

    pub fn enable_initialization(mut self) -> Self {
        self.initialization_enabled = true;
        self
    }

    pub fn add_initializer<I: Initializer + 'static>(mut self, initializer: I) -> Self {
        let result = self.registry.register(initializer);
        self.record(result)
    }

    pub fn add_shared(mut self, initializer: Arc<dyn Initializer>) -> Self {
        let result = self.registry.register_shared(initializer);
        self.record(result)
    }

    /// Add an initializer under an explicit order key.
    ///
    /// A key that is already in use joins that group.
    pub fn add_with_key(mut self, initializer: Arc<dyn Initializer>, key: OrderKey) -> Self {
        self.registry.register_with_key(initializer, key);
        self.enable_initialization()
    }

    pub fn add_factory<F, I>(mut self, factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Initializer + 'static,
    {
        let result = self.registry.register_factory(factory);
        self.record(result)
    }

    pub fn add_fn<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let result = self.registry.register_fn(name, f);
        self.record(result)
    }

    /// Add initializers that run in parallel with each other.
    pub fn add_parallel(mut self, build: impl FnOnce(&mut ParallelBatch)) -> Self {
        let result = self.registry.register_parallel(build);
        self.record(result)
    }

    /// Replace the default `TracingEventSink`.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        if let Some(err) = self.error {
            return Err(err.into());
        }

        let scheduler = self.initialization_enabled.then(|| {
            let sink = self
                .sink
                .clone()
                .unwrap_or_else(|| Arc::new(TracingEventSink) as Arc<dyn EventSink>);
            GroupedScheduler::new(self.registry.entries().to_vec(), sink)
        });

        Ok(App {
            registry: self.registry,
            scheduler,
        })
    }

    fn record(mut self, result: Result<OrderKey, RegistryError>) -> Self {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
        self.enable_initialization()
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App は初期化済みの構成を保持し、`init()` で全 initializer を実行する
pub struct App {
    registry: InitializerRegistry,
    scheduler: Option<GroupedScheduler>,
}

impl App {
    /// Run every registered initializer.
    ///
    /// Fails with `RunError::UnregisteredScheduler` before anything runs when
    /// the initialization service was never enabled. Each call re-runs every
    /// initializer; nothing is remembered from earlier calls.
    pub async fn init(&self) -> Result<RunSummary, RunError> {
        let scheduler = self
            .scheduler
            .as_ref()
            .ok_or(RunError::UnregisteredScheduler)?;
        scheduler.run().await
    }

    pub fn registry(&self) -> &InitializerRegistry {
        &self.registry
    }

    pub fn is_initialization_enabled(&self) -> bool {
        self.scheduler.is_some()
    }
}

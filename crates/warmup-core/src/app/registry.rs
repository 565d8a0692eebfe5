//! InitializerRegistry - initializer の登録と順序キーの払い出し
//!
//! # 順序キー
//! - 登録ごとに新しいキーを昇順で払い出す（最初の登録 = 0）
//! - `register_batch` / `register_parallel` は複数の initializer に 1 つのキーを共有させる
//! - キーはプロセス内で再利用しない（カウンタは registry が所有）
//! - `OrderKey::MAX` まで払い出したら以降の新規登録はエラー

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::domain::{OrderKey, TaskError};
use crate::impls::FnInitializer;
use crate::ports::Initializer;

type Factory = Arc<dyn Fn() -> Arc<dyn Initializer> + Send + Sync>;

/// RegistryError は InitializerRegistry の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("order keys exhausted: the largest order key was already handed out")]
    KeySpaceExhausted,
}

/// Where the scheduler gets an initializer from when its group starts.
#[derive(Clone)]
pub enum InitializerSource {
    /// One instance shared by every run.
    Instance(Arc<dyn Initializer>),
    /// A fresh instance per run, named after the type it builds.
    Factory { name: &'static str, build: Factory },
}

impl InitializerSource {
    /// May panic if a factory panics; the scheduler guards this call.
    pub fn resolve(&self) -> Arc<dyn Initializer> {
        match self {
            InitializerSource::Instance(init) => Arc::clone(init),
            InitializerSource::Factory { build, .. } => build(),
        }
    }

    /// Name known without resolving a factory.
    pub fn name(&self) -> &str {
        match self {
            InitializerSource::Instance(init) => init.name(),
            InitializerSource::Factory { name, .. } => name,
        }
    }

    fn factory<F, I>(f: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Initializer + 'static,
    {
        InitializerSource::Factory {
            name: std::any::type_name::<I>(),
            build: Arc::new(move || Arc::new(f()) as Arc<dyn Initializer>),
        }
    }

    fn delegate<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        InitializerSource::Instance(Arc::new(FnInitializer::new(name, f)))
    }
}

impl fmt::Debug for InitializerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitializerSource::Instance(init) => f.debug_tuple("Instance").field(&init.name()).finish(),
            InitializerSource::Factory { name, .. } => f.debug_tuple("Factory").field(name).finish(),
        }
    }
}

/// A registered initializer and its order key.
#[derive(Debug, Clone)]
pub struct OrderedInitializer {
    pub source: InitializerSource,
    pub order: OrderKey,
}

/// Collects initializers during configuration.
///
/// Built once at startup (mutable), then handed to the scheduler
/// (read-only). Registration order is kept, so equal-key initializers are
/// reported in the order they were added.
#[derive(Debug)]
pub struct InitializerRegistry {
    entries: Vec<OrderedInitializer>,
    /// `None` once `OrderKey::MAX` has been handed out.
    next_key: Option<OrderKey>,
}

impl InitializerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_key: Some(OrderKey::FIRST),
        }
    }

    /// Register an instance under a fresh key.
    pub fn register<I: Initializer + 'static>(
        &mut self,
        initializer: I,
    ) -> Result<OrderKey, RegistryError> {
        self.register_shared(Arc::new(initializer))
    }

    /// Register an already shared instance under a fresh key.
    pub fn register_shared(
        &mut self,
        initializer: Arc<dyn Initializer>,
    ) -> Result<OrderKey, RegistryError> {
        let key = self.take_key()?;
        self.push(InitializerSource::Instance(initializer), key);
        Ok(key)
    }

    /// Register a factory; every run resolves a new instance.
    pub fn register_factory<F, I>(&mut self, factory: F) -> Result<OrderKey, RegistryError>
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Initializer + 'static,
    {
        let key = self.take_key()?;
        self.push(InitializerSource::factory(factory), key);
        Ok(key)
    }

    /// Register an async closure under a fresh key.
    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<OrderKey, RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let key = self.take_key()?;
        self.push(InitializerSource::delegate(name, f), key);
        Ok(key)
    }

    /// Register under a caller-chosen key.
    ///
    /// Fresh keys handed out afterwards stay strictly greater than `key`;
    /// registering at `OrderKey::MAX` leaves no fresh keys.
    pub fn register_with_key(&mut self, initializer: Arc<dyn Initializer>, key: OrderKey) {
        if self.next_key.is_some_and(|next| key >= next) {
            self.next_key = key.checked_next();
        }
        self.push(InitializerSource::Instance(initializer), key);
    }

    /// Register several instances under one fresh key so they run in parallel.
    pub fn register_batch<I>(&mut self, initializers: I) -> Result<OrderKey, RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn Initializer>>,
    {
        let key = self.take_key()?;
        for initializer in initializers {
            self.push(InitializerSource::Instance(initializer), key);
        }
        Ok(key)
    }

    /// Build a parallel batch with a closure; every member shares one fresh key.
    ///
    /// ```ignore
    /// registry.register_parallel(|batch| {
    ///     batch.add(Database::new()).add(Cache::new());
    /// })?;
    /// ```
    pub fn register_parallel(
        &mut self,
        build: impl FnOnce(&mut ParallelBatch),
    ) -> Result<OrderKey, RegistryError> {
        let key = self.take_key()?;
        let mut batch = ParallelBatch::default();
        build(&mut batch);
        for source in batch.sources {
            self.push(source, key);
        }
        Ok(key)
    }

    pub fn entries(&self) -> &[OrderedInitializer] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key the next fresh registration will receive, if any is left.
    pub fn next_key(&self) -> Option<OrderKey> {
        self.next_key
    }

    fn take_key(&mut self) -> Result<OrderKey, RegistryError> {
        let key = self.next_key.ok_or(RegistryError::KeySpaceExhausted)?;
        self.next_key = key.checked_next();
        Ok(key)
    }

    fn push(&mut self, source: InitializerSource, order: OrderKey) {
        self.entries.push(OrderedInitializer { source, order });
    }
}

impl Default for InitializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Members of one `register_parallel` call.
#[derive(Debug, Default)]
pub struct ParallelBatch {
    sources: Vec<InitializerSource>,
}

impl ParallelBatch {
    pub fn add<I: Initializer + 'static>(&mut self, initializer: I) -> &mut Self {
        self.add_shared(Arc::new(initializer))
    }

    pub fn add_shared(&mut self, initializer: Arc<dyn Initializer>) -> &mut Self {
        self.sources.push(InitializerSource::Instance(initializer));
        self
    }

    pub fn add_factory<F, I>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Initializer + 'static,
    {
        self.sources.push(InitializerSource::factory(factory));
        self
    }

    pub fn add_fn<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.sources.push(InitializerSource::delegate(name, f));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Named(&'static str);

    #[async_trait]
    impl Initializer for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn initialize(&self) -> Result<(), TaskError> {
            Ok(())
        }
    }

    fn names_with_keys(registry: &InitializerRegistry) -> Vec<(String, u32)> {
        registry
            .entries()
            .iter()
            .map(|e| (e.source.resolve().name().to_string(), e.order.value()))
            .collect()
    }

    #[test]
    fn sequential_registrations_get_increasing_keys() {
        let mut registry = InitializerRegistry::new();
        let a = registry.register(Named("a")).unwrap();
        let b = registry.register(Named("b")).unwrap();
        let c = registry.register_fn("c", || async { Ok(()) }).unwrap();

        assert_eq!((a.value(), b.value(), c.value()), (0, 1, 2));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.next_key(), Some(OrderKey::new(3)));
    }

    #[test]
    fn batch_shares_one_key() {
        let mut registry = InitializerRegistry::new();
        registry.register(Named("first")).unwrap();
        let key = registry
            .register_batch(vec![
                Arc::new(Named("x")) as Arc<dyn Initializer>,
                Arc::new(Named("y")),
            ])
            .unwrap();
        registry.register(Named("last")).unwrap();

        assert_eq!(key, OrderKey::new(1));
        assert_eq!(
            names_with_keys(&registry),
            vec![
                ("first".to_string(), 0),
                ("x".to_string(), 1),
                ("y".to_string(), 1),
                ("last".to_string(), 2),
            ]
        );
    }

    #[test]
    fn parallel_builder_shares_one_key() {
        let mut registry = InitializerRegistry::new();
        let key = registry
            .register_parallel(|batch| {
                batch
                    .add(Named("db"))
                    .add_fn("cache", || async { Ok(()) })
                    .add_factory(|| Named("search"));
            })
            .unwrap();

        assert_eq!(key, OrderKey::FIRST);
        assert_eq!(registry.len(), 3);
        assert!(registry.entries().iter().all(|e| e.order == key));
    }

    #[test]
    fn empty_parallel_batch_consumes_a_key() {
        let mut registry = InitializerRegistry::new();
        let empty = registry.register_parallel(|_| {}).unwrap();
        let next = registry.register(Named("a")).unwrap();

        assert_eq!(empty, OrderKey::new(0));
        assert_eq!(next, OrderKey::new(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn explicit_key_moves_counter_forward() {
        let mut registry = InitializerRegistry::new();
        registry.register_with_key(Arc::new(Named("late")), OrderKey::new(5));
        let fresh = registry.register(Named("after")).unwrap();
        assert_eq!(fresh, OrderKey::new(6));

        registry.register_with_key(Arc::new(Named("early")), OrderKey::new(1));
        assert_eq!(registry.next_key(), Some(OrderKey::new(7)));
    }

    #[test]
    fn explicit_max_key_exhausts_fresh_keys() {
        let mut registry = InitializerRegistry::new();
        registry.register(Named("first")).unwrap();
        registry.register_with_key(Arc::new(Named("last")), OrderKey::MAX);

        assert_eq!(registry.next_key(), None);
        assert_eq!(
            registry.register_fn("after", || async { Ok(()) }),
            Err(RegistryError::KeySpaceExhausted)
        );
        assert_eq!(
            registry.register_parallel(|batch| {
                batch.add(Named("never"));
            }),
            Err(RegistryError::KeySpaceExhausted)
        );

        // no key was handed out twice and nothing was added
        assert_eq!(
            names_with_keys(&registry),
            vec![("first".to_string(), 0), ("last".to_string(), u32::MAX)]
        );

        // explicit keys still join existing groups
        registry.register_with_key(Arc::new(Named("joins")), OrderKey::FIRST);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.next_key(), None);
    }

    #[test]
    fn last_fresh_key_is_max() {
        let mut registry = InitializerRegistry::new();
        registry.register_with_key(Arc::new(Named("almost")), OrderKey::new(u32::MAX - 1));

        assert_eq!(registry.register(Named("max")), Ok(OrderKey::MAX));
        assert_eq!(
            registry.register(Named("over")),
            Err(RegistryError::KeySpaceExhausted)
        );
    }

    #[test]
    fn factory_resolves_fresh_instance_each_time() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);

        let mut registry = InitializerRegistry::new();
        registry
            .register_factory(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Named("transient")
            })
            .unwrap();

        let source = &registry.entries()[0].source;
        let first = source.resolve();
        let second = source.resolve();

        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(source.name().ends_with("Named"));
    }

    #[test]
    fn instance_is_shared_between_resolves() {
        let mut registry = InitializerRegistry::new();
        registry.register(Named("singleton")).unwrap();

        let source = &registry.entries()[0].source;
        assert!(Arc::ptr_eq(&source.resolve(), &source.resolve()));
        assert_eq!(source.name(), "singleton");
    }
}

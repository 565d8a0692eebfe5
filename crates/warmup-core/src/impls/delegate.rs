//! FnInitializer - クロージャをそのまま initializer として登録する
//!
//! ```ignore
//! registry.register_fn("warm-cache", || async {
//!     cache.warm().await.map_err(TaskError::from_error)
//! })?;
//! ```

use std::future::Future;

use async_trait::async_trait;

use crate::domain::TaskError;
use crate::ports::Initializer;

/// Adapts an async closure into an `Initializer`.
///
/// The closure is invoked once per run, so each run gets a fresh future.
pub struct FnInitializer<F> {
    name: String,
    f: F,
}

impl<F, Fut> FnInitializer<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F, Fut> Initializer for FnInitializer<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self) -> Result<(), TaskError> {
        (self.f)().await
    }
}

//! Initializer port - 起動時タスクの抽象化
//!
//! # 使用例
//! ```ignore
//! struct Migrations { pool: PgPool }
//!
//! #[async_trait]
//! impl Initializer for Migrations {
//!     async fn initialize(&self) -> Result<(), TaskError> {
//!         self.pool.migrate().await.map_err(TaskError::from_error)
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::TaskError;

/// A unit of asynchronous startup work.
///
/// The scheduler calls `initialize` at most once per run. Implementations
/// are shared between runs when registered as instances, so any state they
/// keep must tolerate a second run after a failed one.
#[async_trait]
pub trait Initializer: Send + Sync {
    /// Name used in logs and errors. Defaults to the implementing type.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn initialize(&self) -> Result<(), TaskError>;
}

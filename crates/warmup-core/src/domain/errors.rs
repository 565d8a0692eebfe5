//! Errors - 初期化のエラー型
//!
//! - `TaskError`: 1 つの initializer の失敗理由
//! - `RunError`: `App::init()` 全体の失敗（代表エラー or 未登録）

use std::error::Error as StdError;

use thiserror::Error;

use super::order::OrderKey;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure reason reported by a single initializer.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TaskError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it as the source.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Use the error's own display text as the message.
    pub fn from_error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Built by the scheduler when an initializer panics instead of returning.
    pub(crate) fn panicked(detail: &str) -> Self {
        Self::new(format!("initializer panicked: {detail}"))
    }

    /// Built by the scheduler when a factory panics while building an initializer.
    pub(crate) fn factory_panicked(detail: &str) -> Self {
        Self::new(format!("initializer factory panicked: {detail}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a failed `App::init()` / `GroupedScheduler::run()`.
#[derive(Debug, Error)]
pub enum RunError {
    /// The representative failure of the first failing group.
    #[error("async initialization for {initializer} ({order}) failed: {source}")]
    TaskFailure {
        initializer: String,
        order: OrderKey,
        #[source]
        source: TaskError,
    },

    #[error(
        "the async initialization service isn't registered; enable it with \
         AppBuilder::enable_initialization() or by adding an initializer"
    )]
    UnregisteredScheduler,
}

impl RunError {
    /// The failing task's own error, if this is a task failure.
    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            RunError::TaskFailure { source, .. } => Some(source),
            RunError::UnregisteredScheduler => None,
        }
    }

    /// Name of the initializer whose error is reported.
    pub fn initializer(&self) -> Option<&str> {
        match self {
            RunError::TaskFailure { initializer, .. } => Some(initializer),
            RunError::UnregisteredScheduler => None,
        }
    }
}

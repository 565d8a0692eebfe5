//! Domain model (order keys, errors, run state, events, summaries).
//!
//! 実行ロジックを持たないデータ型だけを置きます。

pub mod errors;
pub mod events;
pub mod order;
pub mod state;
pub mod summary;

pub use self::errors::{RunError, TaskError};
pub use self::events::InitEvent;
pub use self::order::OrderKey;
pub use self::state::RunState;
pub use self::summary::RunSummary;

//! App - アプリケーション層
//!
//! ports を組み合わせて起動時初期化を実装します。
//!
//! # 主要コンポーネント
//! - **InitializerRegistry**: initializer の登録と順序キーの払い出し
//! - **group_by_order**: 順序キーによるグループ化
//! - **GroupedScheduler**: グループ内並列・グループ間逐次の実行
//! - **AppBuilder / App**: ワイヤリングと `init()` エントリポイント

pub mod builder;
pub mod grouping;
pub mod registry;
pub mod scheduler;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::grouping::{Group, group_by_order};
pub use self::registry::{
    InitializerRegistry, InitializerSource, OrderedInitializer, ParallelBatch, RegistryError,
};
pub use self::scheduler::{GroupedScheduler, run_group};

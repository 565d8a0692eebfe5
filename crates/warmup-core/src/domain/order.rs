//! OrderKey - 初期化グループの順序キー
//!
//! 同じキーを持つ initializer は並列に、異なるキーは昇順に逐次実行されます。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering tag shared by every initializer of one group.
///
/// Keys are small non-negative integers handed out by the registry in
/// registration order. Equal keys run concurrently; unequal keys run
/// sequentially, lowest first.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderKey(u32);

impl OrderKey {
    pub const FIRST: OrderKey = OrderKey(0);
    pub const MAX: OrderKey = OrderKey(u32::MAX);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// The key immediately after this one, `None` past `OrderKey::MAX`.
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl From<u32> for OrderKey {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order-{}", self.0)
    }
}

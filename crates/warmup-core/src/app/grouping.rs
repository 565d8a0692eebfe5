//! Grouping - 登録済み initializer を順序キーごとのグループに分割する
//!
//! 実行のたびに作り直す。factory はここでは解決せず、
//! スケジューラがそのグループに到達した時点で解決する。

use std::collections::BTreeMap;

use crate::domain::OrderKey;

use super::registry::{InitializerSource, OrderedInitializer};

/// All initializers sharing one order key, in registration order.
#[derive(Debug, Clone)]
pub struct Group {
    pub order: OrderKey,
    pub sources: Vec<InitializerSource>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(InitializerSource::name).collect()
    }
}

/// Partition `entries` into groups sorted by ascending key.
///
/// Every entry lands in exactly one group and no group is empty.
pub fn group_by_order(entries: &[OrderedInitializer]) -> Vec<Group> {
    let mut by_key: BTreeMap<OrderKey, Vec<InitializerSource>> = BTreeMap::new();
    for entry in entries {
        by_key.entry(entry.order).or_default().push(entry.source.clone());
    }

    by_key
        .into_iter()
        .map(|(order, sources)| Group { order, sources })
        .collect()
}

// テストユーティリティとフォールト注入ストア
// 統合テスト間で共有するヘルパー
#![allow(dead_code)]

pub mod stores;

// 公開API
pub use stores::*;

use item_batch::{DefaultBatchConfig, Item, MemoryItemStore};

/// `count` 件の NEW アイテムを持つメモリストア（IDは1から）
pub async fn seeded_memory_store(count: usize) -> MemoryItemStore {
    MemoryItemStore::with_items((0..count).map(|i| Item::new(format!("item{i}"), "NEW")))
        .await
        .expect("seeding an in-memory store cannot fail")
}

/// 進捗出力なしの設定
pub fn quiet_config(workers: usize) -> DefaultBatchConfig {
    DefaultBatchConfig::default()
        .with_max_concurrent(workers)
        .with_progress_reporting(false)
}

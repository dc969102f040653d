// フォールト注入・計測用のストア実装
// いずれも MemoryItemStore をラップする

use async_trait::async_trait;
use item_batch::{Item, ItemId, ItemStore, MemoryItemStore, StoreError, StoreResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 指定IDの保存が常に失敗するストア
pub struct FaultyStore {
    pub inner: MemoryItemStore,
    failing_ids: HashSet<ItemId>,
}

impl FaultyStore {
    pub fn new(inner: MemoryItemStore, failing_ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            inner,
            failing_ids: failing_ids.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ItemStore for FaultyStore {
    async fn list_all_ids(&self) -> StoreResult<Vec<ItemId>> {
        self.inner.list_all_ids().await
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        match item.id {
            Some(id) if self.failing_ids.contains(&id) => {
                Err(StoreError::conflict(id, "injected save failure"))
            }
            _ => self.inner.save(item).await,
        }
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.inner.find_all().await
    }
}

/// ID列挙の直後に指定IDを削除するストア（列挙と取得の間の削除を再現）
pub struct VanishingStore {
    pub inner: MemoryItemStore,
    vanishing_ids: HashSet<ItemId>,
}

impl VanishingStore {
    pub fn new(inner: MemoryItemStore, vanishing_ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            inner,
            vanishing_ids: vanishing_ids.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ItemStore for VanishingStore {
    async fn list_all_ids(&self) -> StoreResult<Vec<ItemId>> {
        let ids = self.inner.list_all_ids().await?;
        for id in &self.vanishing_ids {
            self.inner.delete_by_id(*id).await?;
        }
        Ok(ids)
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        self.inner.save(item).await
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.inner.find_all().await
    }
}

/// 同時呼び出し数と呼び出し回数を記録するストア
pub struct InstrumentedStore {
    pub inner: MemoryItemStore,
    latency: Duration,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
    find_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl InstrumentedStore {
    pub fn new(inner: MemoryItemStore, latency: Duration) -> Self {
        Self {
            inner,
            latency,
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
            find_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
        }
    }

    /// 観測された最大同時呼び出し数
    pub fn high_water_mark(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    async fn observe(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemStore for InstrumentedStore {
    async fn list_all_ids(&self) -> StoreResult<Vec<ItemId>> {
        self.inner.list_all_ids().await
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.observe().await;
        self.inner.find_by_id(id).await
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.observe().await;
        self.inner.save(item).await
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.inner.find_all().await
    }
}

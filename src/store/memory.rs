use crate::core::{Item, ItemId, ItemStore, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    next_id: ItemId,
    items: BTreeMap<ItemId, Item>,
}

impl MemoryState {
    /// 採番は書き込みロック保持中にのみ行う
    fn assign_id(&mut self, requested: Option<ItemId>) -> ItemId {
        match requested {
            Some(id) => {
                self.next_id = self.next_id.max(id);
                id
            }
            None => {
                self.next_id += 1;
                self.next_id
            }
        }
    }
}

/// メモリ内保存のストア実装（テスト用および開発用）
///
/// クローンは同じ状態を共有する。
#[derive(Debug, Clone, Default)]
pub struct MemoryItemStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存アイテムで初期化（IDの無いものは採番する）
    pub async fn with_items(items: impl IntoIterator<Item = Item>) -> StoreResult<Self> {
        let store = Self::new();
        for item in items {
            store.save(item).await?;
        }
        Ok(store)
    }

    /// 保存されているアイテム数
    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list_all_ids(&self) -> StoreResult<Vec<ItemId>> {
        Ok(self.state.read().await.items.keys().copied().collect())
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn save(&self, mut item: Item) -> StoreResult<Item> {
        let mut state = self.state.write().await;
        let id = state.assign_id(item.id);
        item.id = Some(id);

        state.items.insert(id, item.clone());
        Ok(item)
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        Ok(self.state.write().await.items.remove(&id).is_some())
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        Ok(self.state.read().await.items.values().cloned().collect())
    }
}

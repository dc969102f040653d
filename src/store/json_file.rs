// JSONファイルによる永続化ストア実装

use crate::core::{Item, ItemId, ItemStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

/// ファイルに保存されるスナップショット形式
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    next_id: ItemId,
    items: Vec<Item>,
}

#[derive(Debug, Default)]
struct StoreState {
    next_id: ItemId,
    items: BTreeMap<ItemId, Item>,
}

impl StoreState {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut next_id = snapshot.next_id;
        let mut items = BTreeMap::new();
        for item in snapshot.items {
            if let Some(id) = item.id {
                next_id = next_id.max(id);
                items.insert(id, item);
            }
        }
        Self { next_id, items }
    }

    fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            next_id: self.next_id,
            items: self.items.values().cloned().collect(),
        }
    }
}

/// JSONファイルによる永続化ストア
///
/// 変更のたびにファイル全体を一時ファイルへ書き出し、rename で置き換える。
/// 全操作は単一の非同期ロックで直列化される。
#[derive(Debug, Clone)]
pub struct JsonFileItemStore {
    path: PathBuf,
    state: Arc<AsyncMutex<StoreState>>,
}

impl JsonFileItemStore {
    /// ストアファイルを開く（存在しなければ空のストアとして開始）
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => StoreState::default(),
            Ok(bytes) => {
                let snapshot: StoreSnapshot =
                    serde_json::from_slice(&bytes).map_err(StoreError::serialization)?;
                StoreState::from_snapshot(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        tracing::debug!(
            path = %path.display(),
            items = state.items.len(),
            "opened item store"
        );

        Ok(Self {
            path,
            state: Arc::new(AsyncMutex::new(state)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, state: &StoreState) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(&state.to_snapshot())
            .map_err(StoreError::serialization)?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        Ok(())
    }
}

#[async_trait]
impl ItemStore for JsonFileItemStore {
    async fn list_all_ids(&self) -> StoreResult<Vec<ItemId>> {
        Ok(self.state.lock().await.items.keys().copied().collect())
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.state.lock().await.items.get(&id).cloned())
    }

    async fn save(&self, mut item: Item) -> StoreResult<Item> {
        let mut state = self.state.lock().await;

        let id = match item.id {
            Some(id) => {
                state.next_id = state.next_id.max(id);
                id
            }
            None => {
                state.next_id += 1;
                state.next_id
            }
        };
        item.id = Some(id);

        let previous = state.items.insert(id, item.clone());
        if let Err(e) = self.persist(&state).await {
            // 書き込みに失敗した変更はメモリ上でも取り消す
            match previous {
                Some(previous) => state.items.insert(id, previous),
                None => state.items.remove(&id),
            };
            return Err(e);
        }

        Ok(item)
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;

        let Some(previous) = state.items.remove(&id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&state).await {
            state.items.insert(id, previous);
            return Err(e);
        }

        Ok(true)
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        Ok(self.state.lock().await.items.values().cloned().collect())
    }
}

// アプリケーションファサード
// ストアとバッチプロセッサを所有し、CRUDと一括処理を提供する

use crate::{
    core::{
        BatchConfig, BatchReport, Item, ItemDraft, ItemId, ItemStore, ProcessingError,
        ProcessingResult, ProgressReporter,
    },
    engine::BatchProcessor,
};
use std::sync::Arc;

/// アイテム管理サービス
///
/// 依存関係を直接所有し、ストアはバッチプロセッサと共有する。
pub struct ItemService<S, C, R> {
    store: Arc<S>,
    processor: BatchProcessor<S, C, R>,
}

impl<S, C, R> ItemService<S, C, R>
where
    S: ItemStore + 'static,
    C: BatchConfig,
    R: ProgressReporter + 'static,
{
    /// 新しいサービスを作成（コンストラクタインジェクション）
    pub fn new(store: S, config: C, reporter: R) -> ProcessingResult<Self> {
        let store = Arc::new(store);
        let processor = BatchProcessor::with_shared_store(Arc::clone(&store), config, reporter)?;
        Ok(Self { store, processor })
    }

    pub fn store(&self) -> &S {
        self.store.as_ref()
    }

    pub fn processor(&self) -> &BatchProcessor<S, C, R> {
        &self.processor
    }

    pub async fn find_all(&self) -> ProcessingResult<Vec<Item>> {
        self.store.find_all().await.map_err(ProcessingError::store)
    }

    pub async fn find_by_id(&self, id: ItemId) -> ProcessingResult<Option<Item>> {
        self.store
            .find_by_id(id)
            .await
            .map_err(ProcessingError::store)
    }

    /// ドラフトを検証して新規保存
    pub async fn create(&self, draft: ItemDraft) -> ProcessingResult<Item> {
        let item = draft.validate()?.into_item(None);
        let saved = self
            .store
            .save(item)
            .await
            .map_err(ProcessingError::store)?;

        tracing::debug!(item_id = saved.id, "item created");
        Ok(saved)
    }

    /// 既存アイテムを置き換え（存在しなければ `None`）
    pub async fn update(&self, id: ItemId, draft: ItemDraft) -> ProcessingResult<Option<Item>> {
        let draft = draft.validate()?;

        if self.find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let saved = self
            .store
            .save(draft.into_item(Some(id)))
            .await
            .map_err(ProcessingError::store)?;
        Ok(Some(saved))
    }

    pub async fn delete_by_id(&self, id: ItemId) -> ProcessingResult<bool> {
        self.store
            .delete_by_id(id)
            .await
            .map_err(ProcessingError::store)
    }

    /// 全アイテムを一括処理
    pub async fn process_items(&self) -> ProcessingResult<Vec<Item>> {
        self.processor.process_all().await
    }

    pub async fn process_items_with_report(&self) -> ProcessingResult<BatchReport> {
        self.processor.process_all_with_report().await
    }

    pub async fn shutdown(self) -> ProcessingResult<()> {
        self.processor.shutdown().await
    }
}

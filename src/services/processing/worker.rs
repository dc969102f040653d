// Worker - 単一アイテム処理機能

use crate::core::{
    Item, ItemId, ItemOutcome, ItemStore, ProcessingError, ProcessingResult, PROCESSED_STATUS,
};

/// 単一アイテムの処理（取得 → ステータス更新 → 保存）
///
/// 失敗はここで捕捉してログに残し、`ItemOutcome::Failed` として返す。
/// 呼び出し側へエラーが伝播することはない。
pub async fn process_single_item<S>(store: &S, id: ItemId, worker_id: usize) -> ItemOutcome
where
    S: ItemStore + ?Sized,
{
    match transition(store, id).await {
        Ok(Some(item)) => ItemOutcome::Processed(item),
        Ok(None) => {
            tracing::debug!(item_id = id, worker_id, "item vanished before processing");
            ItemOutcome::Vanished { id }
        }
        Err(error) => {
            tracing::warn!(
                item_id = id,
                worker_id,
                severity = error.severity().as_str(),
                recoverable = error.is_recoverable(),
                %error,
                "failed to process item"
            );
            ItemOutcome::Failed {
                id,
                error: error.to_string(),
            }
        }
    }
}

async fn transition<S>(store: &S, id: ItemId) -> ProcessingResult<Option<Item>>
where
    S: ItemStore + ?Sized,
{
    let Some(mut item) = store
        .find_by_id(id)
        .await
        .map_err(|e| ProcessingError::item_processing(id, e))?
    else {
        return Ok(None);
    };

    item.status = PROCESSED_STATUS.to_string();

    // ストアの返す値を正規形として扱う
    let saved = store
        .save(item)
        .await
        .map_err(|e| ProcessingError::item_processing(id, e))?;

    Ok(Some(saved))
}

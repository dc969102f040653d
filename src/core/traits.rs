// バッチ処理システムのトレイト定義
// ストア・設定・進捗報告の抽象化インターフェース

use super::error::StoreResult;
use super::types::{Item, ItemId};
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// アイテムを永続化するストアの抽象化
///
/// 複数ワーカーから同時に呼ばれるため、単一レコードの find/save が
/// アトミックであることを実装側が保証する。
#[automock]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// 既知の全IDを取得
    async fn list_all_ids(&self) -> StoreResult<Vec<ItemId>>;

    /// IDでアイテムを取得（存在しなければ `None`）
    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>>;

    /// アイテムを保存し、永続化された正規形を返す。`id` が `None` なら採番する
    async fn save(&self, item: Item) -> StoreResult<Item>;

    /// IDでアイテムを削除（削除した場合 true）
    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool>;

    /// 全アイテムをID順で取得
    async fn find_all(&self) -> StoreResult<Vec<Item>>;
}

// ItemStore for Box<dyn ItemStore>
#[async_trait]
impl ItemStore for Box<dyn ItemStore> {
    async fn list_all_ids(&self) -> StoreResult<Vec<ItemId>> {
        self.as_ref().list_all_ids().await
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.as_ref().find_by_id(id).await
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        self.as_ref().save(item).await
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        self.as_ref().delete_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.as_ref().find_all().await
    }
}

/// バッチ処理の設定を抽象化するトレイト
#[automock]
pub trait BatchConfig: Send + Sync {
    /// ワーカープールの同時実行スロット数
    fn max_concurrent_tasks(&self) -> usize;

    /// 結果チャンネルのバッファサイズ
    fn channel_buffer_size(&self) -> usize;

    /// 新規ユニットの着手を打ち切るまでの時間
    fn deadline(&self) -> Option<Duration>;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// BatchConfig for Box<dyn BatchConfig>
impl BatchConfig for Box<dyn BatchConfig> {
    fn max_concurrent_tasks(&self) -> usize {
        self.as_ref().max_concurrent_tasks()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn deadline(&self) -> Option<Duration> {
        self.as_ref().deadline()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_items: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// アイテム単位の失敗の報告
    async fn report_error(&self, id: ItemId, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, total_processed: usize, total_skipped: usize);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize) {
        self.as_ref().report_started(total_items).await
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total).await
    }

    async fn report_error(&self, id: ItemId, error: &str) {
        self.as_ref().report_error(id, error).await
    }

    async fn report_completed(&self, total_processed: usize, total_skipped: usize) {
        self.as_ref()
            .report_completed(total_processed, total_skipped)
            .await
    }
}

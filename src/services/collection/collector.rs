// Collector - 結果収集機能

use crate::core::{Item, ItemFailure, ItemId, ItemOutcome, ProgressReporter};
use crate::services::monitoring::contain_report;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 成功したアイテムを蓄積する追記専用コンテナ
///
/// `append` はどのタスクからでも同時に呼べる。クローンは同じ内容を共有する。
#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    items: Arc<Mutex<Vec<Item>>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
        }
    }

    /// アイテムを追加
    pub fn append(&self, item: Item) {
        self.items.lock().push(item);
    }

    /// 現時点の内容のコピー
    ///
    /// 処理中に呼ぶと途中経過（非決定的な部分集合）が返る。最終結果には
    /// 完了バリア通過後の `into_items` を使うこと。
    pub fn peek(&self) -> Vec<Item> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// 最終スナップショットを取得
    ///
    /// 他のクローンが残っている場合は内容をコピーして返す。
    pub fn into_items(self) -> Vec<Item> {
        match Arc::try_unwrap(self.items) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().clone(),
        }
    }
}

/// コレクタータスクが集計した結果
#[derive(Debug, Default)]
pub struct CollectedOutcomes {
    pub collector: ResultCollector,
    pub vanished: Vec<ItemId>,
    pub failed: Vec<ItemFailure>,
    pub abandoned: Vec<ItemId>,
}

impl CollectedOutcomes {
    pub fn completed(&self) -> usize {
        self.collector.len() + self.skipped()
    }

    pub fn skipped(&self) -> usize {
        self.vanished.len() + self.failed.len() + self.abandoned.len()
    }
}

/// Collector: 結果チャンネルの単一コンシューマー
///
/// 送信側が全て閉じられるまで結果を受信し続け、集計を返す。
/// 報告側がパニックしても受信は止めない。
pub fn spawn_result_collector<R>(
    mut result_rx: mpsc::Receiver<ItemOutcome>,
    total_items: usize,
    reporter: Arc<R>,
) -> tokio::task::JoinHandle<CollectedOutcomes>
where
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut outcomes = CollectedOutcomes {
            collector: ResultCollector::with_capacity(total_items),
            ..CollectedOutcomes::default()
        };

        while let Some(outcome) = result_rx.recv().await {
            match outcome {
                ItemOutcome::Processed(item) => outcomes.collector.append(item),
                ItemOutcome::Vanished { id } => outcomes.vanished.push(id),
                ItemOutcome::Failed { id, error } => {
                    contain_report("error", reporter.report_error(id, &error)).await;
                    outcomes.failed.push(ItemFailure { id, error });
                }
                ItemOutcome::Abandoned { id } => outcomes.abandoned.push(id),
            }

            // 進捗報告
            let progress = reporter.report_progress(outcomes.completed(), total_items);
            contain_report("progress", progress).await;
        }

        outcomes
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockProgressReporter;
    use crate::core::PROCESSED_STATUS;
    use crate::services::monitoring::NoOpProgressReporter;
    use mockall::predicate::*;

    /// 全ての報告でパニックする報告実装
    struct PanickingReporter;

    #[async_trait::async_trait]
    impl ProgressReporter for PanickingReporter {
        async fn report_started(&self, _total_items: usize) {
            panic!("started hook bug");
        }

        async fn report_progress(&self, _completed: usize, _total: usize) {
            panic!("progress hook bug");
        }

        async fn report_error(&self, _id: ItemId, _error: &str) {
            panic!("error hook bug");
        }

        async fn report_completed(&self, _total_processed: usize, _total_skipped: usize) {
            panic!("completed hook bug");
        }
    }

    fn processed(id: ItemId) -> Item {
        let mut item = Item::new(format!("item{id}"), PROCESSED_STATUS);
        item.id = Some(id);
        item
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_all_kept() {
        let collector = ResultCollector::new();
        let mut handles = Vec::new();

        for task in 0..8u64 {
            let collector = collector.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..25u64 {
                    collector.append(processed(task * 100 + i));
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ids: Vec<ItemId> = collector
            .into_items()
            .into_iter()
            .filter_map(|item| item.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let collector = ResultCollector::new();
        collector.append(processed(1));

        assert_eq!(collector.peek().len(), 1);
        assert_eq!(collector.len(), 1);
        assert!(!collector.is_empty());
    }

    #[test]
    fn test_into_items_with_outstanding_clone() {
        let collector = ResultCollector::new();
        let other = collector.clone();
        collector.append(processed(1));

        assert_eq!(collector.into_items().len(), 1);
        assert_eq!(other.len(), 1);
    }

    #[tokio::test]
    async fn test_result_collector_tallies_mixed_outcomes() {
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(10);
        let reporter = Arc::new(NoOpProgressReporter::new());
        let handle = spawn_result_collector(result_rx, 4, reporter);

        result_tx
            .send(ItemOutcome::Processed(processed(1)))
            .await
            .unwrap();
        result_tx
            .send(ItemOutcome::Vanished { id: 2 })
            .await
            .unwrap();
        result_tx
            .send(ItemOutcome::Failed {
                id: 3,
                error: "save failed".to_string(),
            })
            .await
            .unwrap();
        result_tx
            .send(ItemOutcome::Abandoned { id: 4 })
            .await
            .unwrap();
        drop(result_tx); // チャンネル終了

        let outcomes = handle.await.unwrap();
        assert_eq!(outcomes.collector.len(), 1);
        assert_eq!(outcomes.vanished, vec![2]);
        assert_eq!(outcomes.failed[0].id, 3);
        assert_eq!(outcomes.abandoned, vec![4]);
        assert_eq!(outcomes.completed(), 4);
        assert_eq!(outcomes.skipped(), 3);
    }

    #[tokio::test]
    async fn test_result_collector_reports_failures_and_progress() {
        let mut reporter = MockProgressReporter::new();
        reporter
            .expect_report_error()
            .with(eq(9), eq("boom"))
            .times(1)
            .returning(|_, _| ());
        reporter
            .expect_report_progress()
            .times(2)
            .returning(|_, _| ());

        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(4);
        let handle = spawn_result_collector(result_rx, 2, Arc::new(reporter));

        result_tx
            .send(ItemOutcome::Processed(processed(8)))
            .await
            .unwrap();
        result_tx
            .send(ItemOutcome::Failed {
                id: 9,
                error: "boom".to_string(),
            })
            .await
            .unwrap();
        drop(result_tx);

        let outcomes = handle.await.unwrap();
        assert_eq!(outcomes.completed(), 2);
    }

    #[tokio::test]
    async fn test_result_collector_empty_channel() {
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(1);
        drop(result_tx);

        let reporter = Arc::new(NoOpProgressReporter::new());
        let outcomes = spawn_result_collector(result_rx, 0, reporter)
            .await
            .unwrap();
        assert!(outcomes.collector.is_empty());
        assert_eq!(outcomes.completed(), 0);
    }

    #[tokio::test]
    async fn test_result_collector_survives_panicking_reporter() {
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(4);
        let handle = spawn_result_collector(result_rx, 3, Arc::new(PanickingReporter));

        for id in 1..=2 {
            result_tx
                .send(ItemOutcome::Processed(processed(id)))
                .await
                .unwrap();
        }
        result_tx
            .send(ItemOutcome::Failed {
                id: 3,
                error: "save failed".to_string(),
            })
            .await
            .unwrap();
        drop(result_tx);

        let outcomes = handle.await.unwrap();
        assert_eq!(outcomes.collector.len(), 2);
        assert_eq!(outcomes.failed.len(), 1);
        assert_eq!(outcomes.completed(), 3);
    }
}

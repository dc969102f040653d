// BatchProcessor - ストア全件の並列ステータス更新エンジン
// ストア・設定・進捗報告の全依存関係をコンストラクタで注入する

use super::barrier::CompletionBarrier;
use super::worker_pool::{current_worker_id, JobHandle, WorkerPool};
use crate::{
    core::{
        BatchConfig, BatchReport, Item, ItemFailure, ItemId, ItemOutcome, ItemStore,
        ProcessingError, ProcessingResult, ProgressReporter,
    },
    services::{
        collection::spawn_result_collector,
        config::validate_config,
        monitoring::{contain_report, NoOpProgressReporter},
        processing::process_single_item,
    },
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// ストア内の全アイテムを並列に `PROCESSED` へ遷移させるプロセッサ
///
/// ワーカープールはプロセッサと同じ寿命を持つ。`new` はワーカータスクを
/// 起動するため、tokio ランタイム内で呼ぶ必要がある。
pub struct BatchProcessor<S, C, R> {
    store: Arc<S>,
    config: Arc<C>,
    reporter: Arc<R>,
    pool: WorkerPool,
}

impl<S, C, R> BatchProcessor<S, C, R>
where
    S: ItemStore + 'static,
    C: BatchConfig,
    R: ProgressReporter + 'static,
{
    /// 新しいプロセッサを作成
    pub fn new(store: S, config: C, reporter: R) -> ProcessingResult<Self> {
        Self::with_shared_store(Arc::new(store), config, reporter)
    }

    /// 他のコンポーネントと共有するストアで作成
    pub fn with_shared_store(store: Arc<S>, config: C, reporter: R) -> ProcessingResult<Self> {
        validate_config(&config)?;
        let pool = WorkerPool::new(config.max_concurrent_tasks())?;

        Ok(Self {
            store,
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            pool,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &C {
        self.config.as_ref()
    }

    pub fn reporter(&self) -> &R {
        self.reporter.as_ref()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    /// 全アイテムを処理し、成功したアイテムを返す（順序不定）
    ///
    /// 失敗したIDは結果から除外されるだけで、エラーになるのはID列挙の失敗のみ。
    pub async fn process_all(&self) -> ProcessingResult<Vec<Item>> {
        Ok(self.process_all_with_report().await?.items)
    }

    /// 全アイテムを処理し、除外理由を含むレポートを返す
    pub async fn process_all_with_report(&self) -> ProcessingResult<BatchReport> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        let ids = self
            .store
            .list_all_ids()
            .await
            .map_err(ProcessingError::enumeration)?;
        let ids = dedup_ids(ids);

        if ids.is_empty() {
            tracing::debug!("store is empty, nothing to dispatch");
            return Ok(BatchReport::empty(started_at));
        }

        let total = ids.len();
        let deadline = self.config.deadline().map(|limit| start_time + limit);
        let reporter = self.effective_reporter();
        contain_report("started", reporter.report_started(total)).await;

        // 結果チャンネルとコレクター
        let buffer_size = self.config.channel_buffer_size();
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(buffer_size);
        let collector_handle = spawn_result_collector(result_rx, total, Arc::clone(&reporter));

        let barrier = CompletionBarrier::new();
        let mut handles: Vec<(ItemId, JobHandle<()>)> = Vec::with_capacity(total);

        for id in ids {
            let guard = barrier.register();
            let store = Arc::clone(&self.store);
            let result_tx = result_tx.clone();

            let job = async move {
                let outcome = if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    tracing::debug!(item_id = id, "deadline expired, item abandoned");
                    ItemOutcome::Abandoned { id }
                } else {
                    let worker_id = current_worker_id().unwrap_or_default();
                    process_single_item(store.as_ref(), id, worker_id).await
                };

                // 送信してからガードを解放
                if result_tx.send(outcome).await.is_err() {
                    tracing::warn!(item_id = id, "result channel closed, outcome dropped");
                }
                guard.complete();
            };

            handles.push((id, self.pool.submit(job)?));
        }

        // 全ユニットの完了を待機
        barrier.wait().await;

        // result_txを閉じてCollectorに完了を通知
        drop(result_tx);
        let mut outcomes = collector_handle.await.map_err(ProcessingError::task)?;

        // 結果を送らずに終わったジョブ（パニック）を失敗として記録
        for (id, handle) in handles {
            if let Err(error) = handle.join().await {
                tracing::error!(
                    item_id = id,
                    severity = error.severity().as_str(),
                    %error,
                    "unit of work aborted"
                );
                outcomes.failed.push(ItemFailure {
                    id,
                    error: error.to_string(),
                });
            }
        }

        let skipped = outcomes.skipped();
        let items = outcomes.collector.into_items();
        contain_report("completed", reporter.report_completed(items.len(), skipped)).await;

        let partial = !outcomes.abandoned.is_empty();
        if partial {
            tracing::warn!(
                abandoned = outcomes.abandoned.len(),
                total,
                "deadline expired before every item was started"
            );
        }

        Ok(BatchReport {
            items,
            attempted: total,
            vanished: outcomes.vanished,
            failed: outcomes.failed,
            abandoned: outcomes.abandoned,
            partial,
            started_at,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// プールを停止
    pub async fn shutdown(self) -> ProcessingResult<()> {
        self.pool.shutdown().await
    }

    fn effective_reporter(&self) -> Arc<dyn ProgressReporter> {
        if self.config.enable_progress_reporting() {
            Arc::clone(&self.reporter) as Arc<dyn ProgressReporter>
        } else {
            Arc::new(NoOpProgressReporter::new())
        }
    }
}

/// 重複IDを取り除く（最初の出現を残す）
fn dedup_ids(ids: Vec<ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(ids.len());
    let before = ids.len();
    let unique: Vec<ItemId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();

    if unique.len() != before {
        tracing::warn!(
            duplicates = before - unique.len(),
            "store returned duplicate ids"
        );
    }
    unique
}

// 進捗監視の具象実装

use crate::core::{ItemId, ProgressReporter};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// tracing による進捗報告実装
///
/// 進捗は全体の10%刻み（および最後の1件）でのみ出力する。
#[derive(Debug, Default, Clone)]
pub struct LoggingProgressReporter {
    quiet: bool,
}

impl LoggingProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    fn is_milestone(completed: usize, total: usize) -> bool {
        let step = (total / 10).max(1);
        completed == total || completed.is_multiple_of(step)
    }
}

#[async_trait]
impl ProgressReporter for LoggingProgressReporter {
    async fn report_started(&self, total_items: usize) {
        if !self.quiet {
            tracing::info!(total = total_items, "starting batch processing");
        }
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && Self::is_milestone(completed, total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            tracing::info!(completed, total, "progress {percentage:.1}%");
        }
    }

    async fn report_error(&self, id: ItemId, error: &str) {
        // 失敗自体はユニット・オブ・ワーク側で warn 出力済み
        if !self.quiet {
            tracing::debug!(item_id = id, error, "item excluded from batch result");
        }
    }

    async fn report_completed(&self, total_processed: usize, total_skipped: usize) {
        if !self.quiet {
            tracing::info!(
                processed = total_processed,
                skipped = total_skipped,
                "batch processing completed"
            );
        }
    }
}

/// 報告呼び出しを実行し、パニックはログに残して握りつぶす
///
/// 報告側の不具合でバッチ処理そのものを止めないためのもの。
/// パニックが発生した場合は false を返す。
pub async fn contain_report<F>(stage: &'static str, report: F) -> bool
where
    F: Future<Output = ()>,
{
    match AssertUnwindSafe(report).catch_unwind().await {
        Ok(()) => true,
        Err(payload) => {
            let panic = panic_message(payload.as_ref());
            tracing::error!(stage, %panic, "progress reporter panicked");
            false
        }
    }
}

/// パニックのペイロードから表示用メッセージを取り出す
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: usize) {}

    async fn report_progress(&self, _completed: usize, _total: usize) {}

    async fn report_error(&self, _id: ItemId, _error: &str) {}

    async fn report_completed(&self, _total_processed: usize, _total_skipped: usize) {}
}

// 高レベル公開API
// BatchProcessorを簡単に使用できるようにするための便利な関数

use super::BatchProcessor;
use crate::{
    core::{BatchConfig, BatchReport, ItemStore, ProcessingResult, ProgressReporter},
    services::{DefaultBatchConfig, LoggingProgressReporter, NoOpProgressReporter},
};

/// 設定済みBatchProcessorでストア全件を処理
pub async fn process_store<S, C, R>(
    processor: &BatchProcessor<S, C, R>,
) -> ProcessingResult<BatchReport>
where
    S: ItemStore + 'static,
    C: BatchConfig,
    R: ProgressReporter + 'static,
{
    processor.process_all_with_report().await
}

/// BatchProcessor作成のヘルパー関数
///
/// デフォルト設定と tracing による進捗報告
pub fn create_default_batch_processor<S>(
    store: S,
) -> ProcessingResult<BatchProcessor<S, DefaultBatchConfig, LoggingProgressReporter>>
where
    S: ItemStore + 'static,
{
    BatchProcessor::new(
        store,
        DefaultBatchConfig::default(),
        LoggingProgressReporter::new(),
    )
}

/// BatchProcessor作成のヘルパー関数（静音版）
///
/// テストやバックグラウンド処理用
pub fn create_quiet_batch_processor<S>(
    store: S,
) -> ProcessingResult<BatchProcessor<S, DefaultBatchConfig, NoOpProgressReporter>>
where
    S: ItemStore + 'static,
{
    BatchProcessor::new(
        store,
        DefaultBatchConfig::default(),
        NoOpProgressReporter::new(),
    )
}

use super::{open_store, with_error_context};
use crate::{
    app::ItemService,
    core::{BatchConfig, BatchReport},
    services::{DefaultBatchConfig, LoggingProgressReporter},
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration struct for process command
#[derive(Debug, Default)]
pub struct ProcessConfig {
    pub store: Option<PathBuf>,
    pub workers: Option<usize>,
    pub deadline_ms: Option<u64>,
    pub preset: Option<String>,
}

/// プリセット → 環境変数 → コマンドライン引数の順で設定を解決
pub fn resolve_batch_config(config: &ProcessConfig) -> Result<DefaultBatchConfig> {
    let preset = config.preset.as_deref().unwrap_or("default");
    let mut batch_config = DefaultBatchConfig::from_preset(preset)
        .and_then(DefaultBatchConfig::with_env)
        .map_err(with_error_context)?;

    if let Some(workers) = config.workers {
        batch_config = batch_config.with_max_concurrent(workers);
    }
    if let Some(deadline_ms) = config.deadline_ms {
        batch_config = batch_config.with_deadline(Duration::from_millis(deadline_ms));
    }

    batch_config.validate().map_err(with_error_context)?;
    Ok(batch_config)
}

/// Execute process command
pub async fn execute_process_command(config: ProcessConfig) -> Result<BatchReport> {
    let batch_config = resolve_batch_config(&config)?;
    tracing::info!(
        workers = batch_config.max_concurrent_tasks(),
        buffer = batch_config.channel_buffer_size(),
        deadline_ms = batch_config.deadline().map(|d| d.as_millis() as u64),
        "batch configuration resolved"
    );

    let store = open_store(config.store.as_deref()).await?;
    let service = ItemService::new(store, batch_config, LoggingProgressReporter::new())?;

    let report = service
        .process_items_with_report()
        .await
        .map_err(with_error_context)
        .context("Batch processing failed")?;
    service.shutdown().await?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");

    if report.partial {
        tracing::warn!(
            abandoned = report.abandoned.len(),
            "deadline reached, report is partial"
        );
    }

    Ok(report)
}

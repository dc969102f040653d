// 設定管理の具象実装

use crate::core::{BatchConfig, ProcessingError, ProcessingResult};
use std::time::Duration;

/// 同時実行スロット数の既定値
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 10;

/// 結果チャンネルのバッファサイズ既定値
pub const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 100;

pub const ENV_MAX_CONCURRENT: &str = "ITEM_BATCH_MAX_CONCURRENT";
pub const ENV_BUFFER_SIZE: &str = "ITEM_BATCH_BUFFER_SIZE";
pub const ENV_DEADLINE_MS: &str = "ITEM_BATCH_DEADLINE_MS";

/// デフォルト設定実装
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultBatchConfig {
    max_concurrent: usize,
    buffer_size: usize,
    deadline: Option<Duration>,
    enable_progress: bool,
}

impl DefaultBatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// CPU数ベースの並列度で作成
    pub fn for_cpus(cpu_count: usize) -> Self {
        Self::default().with_max_concurrent(cpu_count.max(1) * 2)
    }

    /// プリセット名から作成 (default, high_performance, testing)
    pub fn from_preset(preset: &str) -> ProcessingResult<Self> {
        match preset {
            "default" => Ok(Self::default()),
            "high_performance" => Ok(Self::for_cpus(num_cpus::get()).with_buffer_size(1000)),
            "testing" => Ok(Self::default()
                .with_max_concurrent(2)
                .with_buffer_size(4)
                .with_progress_reporting(false)),
            other => Err(ProcessingError::configuration(format!(
                "未サポートのプリセット: {other}. 利用可能: default, high_performance, testing"
            ))),
        }
    }

    /// プロセス環境変数で上書き
    pub fn with_env(self) -> ProcessingResult<Self> {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のルックアップ関数で上書き
    pub fn with_env_lookup<F>(mut self, lookup: F) -> ProcessingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_CONCURRENT) {
            self.max_concurrent = parse_number(ENV_MAX_CONCURRENT, &value)? as usize;
        }
        if let Some(value) = lookup(ENV_BUFFER_SIZE) {
            self.buffer_size = parse_number(ENV_BUFFER_SIZE, &value)? as usize;
        }
        if let Some(value) = lookup(ENV_DEADLINE_MS) {
            let millis = parse_number(ENV_DEADLINE_MS, &value)?;
            self.deadline = Some(Duration::from_millis(millis));
        }
        Ok(self)
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// 設定値の検証
    pub fn validate(&self) -> ProcessingResult<()> {
        validate_config(self)
    }
}

impl Default for DefaultBatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT_TASKS,
            buffer_size: DEFAULT_CHANNEL_BUFFER_SIZE,
            deadline: None,
            enable_progress: true,
        }
    }
}

impl BatchConfig for DefaultBatchConfig {
    fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

/// 任意の BatchConfig 実装を検証
pub fn validate_config<C: BatchConfig + ?Sized>(config: &C) -> ProcessingResult<()> {
    if config.max_concurrent_tasks() == 0 {
        return Err(ProcessingError::configuration(
            "並列タスク数は1以上である必要があります",
        ));
    }
    if config.channel_buffer_size() == 0 {
        return Err(ProcessingError::configuration(
            "チャンネルバッファサイズは1以上である必要があります",
        ));
    }
    Ok(())
}

fn parse_number(key: &str, value: &str) -> ProcessingResult<u64> {
    value.trim().parse::<u64>().map_err(|e| {
        ProcessingError::configuration(format!("{key} の値が不正です: {value} ({e})"))
    })
}

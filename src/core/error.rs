// バッチ処理とストア操作のカスタムエラー型定義

use super::types::ItemId;
use std::path::PathBuf;
use thiserror::Error;

/// ストア層のエラー型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("ストアI/Oエラー: {} - {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("シリアライズエラー: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("ストア利用不可: {message}")]
    Unavailable { message: String },

    #[error("書き込み競合: id={id} - {message}")]
    Conflict { id: ItemId, message: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(source: serde_json::Error) -> Self {
        Self::Serialization { source }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn conflict(id: ItemId, message: impl Into<String>) -> Self {
        Self::Conflict {
            id,
            message: message.into(),
        }
    }
}

/// バッチ処理固有のエラー型
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("ID列挙エラー: {source}")]
    EnumerationError {
        #[source]
        source: StoreError,
    },

    #[error("アイテム処理エラー: id={id} - {source}")]
    ItemProcessingError {
        id: ItemId,
        #[source]
        source: StoreError,
    },

    #[error("ストアエラー: {source}")]
    StoreError {
        #[source]
        source: StoreError,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("バリデーションエラー: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("ワーカープールは既に停止しています")]
    PoolClosed,

    #[error("ジョブ中断エラー: {message}")]
    JobAborted { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ProcessingError {
    /// ID列挙エラーの作成
    pub fn enumeration(source: StoreError) -> Self {
        Self::EnumerationError { source }
    }

    /// 単一アイテム処理エラーの作成
    pub fn item_processing(id: ItemId, source: StoreError) -> Self {
        Self::ItemProcessingError { id, source }
    }

    pub fn store(source: StoreError) -> Self {
        Self::StoreError { source }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// バリデーションエラーの作成
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn job_aborted(message: impl Into<String>) -> Self {
        Self::JobAborted {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EnumerationError { .. } => ErrorSeverity::High,
            Self::ItemProcessingError { .. } => ErrorSeverity::Low,
            Self::StoreError { .. } => ErrorSeverity::Medium,
            Self::ConfigurationError { .. } => ErrorSeverity::High,
            Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::PoolClosed => ErrorSeverity::Critical,
            Self::JobAborted { .. } | Self::TaskError { .. } => ErrorSeverity::Medium,
        }
    }

    /// エラーが回復可能かどうかを判定
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::EnumerationError { .. } => true,
            Self::ItemProcessingError { .. } => true,
            Self::StoreError { .. } => true,
            Self::ConfigurationError { .. } => false,
            Self::ValidationError { .. } => false,
            Self::PoolClosed => false,
            Self::JobAborted { .. } => true,
            Self::TaskError { .. } => true,
        }
    }

    /// エラーコンテキストを取得
    pub fn context(&self) -> ErrorContext {
        match self {
            Self::EnumerationError { .. } => ErrorContext::new("enumeration")
                .with_suggestion("ストアの接続状態を確認してください"),
            Self::ItemProcessingError { id, .. } => {
                ErrorContext::new("item_processing").with_resource(id.to_string())
            }
            Self::ConfigurationError { message } => ErrorContext::new("configuration")
                .with_suggestion(format!("設定を確認してください: {message}")),
            Self::ValidationError { field, .. } => {
                ErrorContext::new("validation").with_resource(field.clone())
            }
            _ => ErrorContext::new("unknown"),
        }
    }
}

impl From<StoreError> for ProcessingError {
    fn from(error: StoreError) -> Self {
        ProcessingError::StoreError { source: error }
    }
}

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(error: tokio::task::JoinError) -> Self {
        ProcessingError::TaskError { source: error }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// エラーコンテキスト情報
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// 実行していた操作
    pub operation: String,
    /// 関連するリソース（アイテムID、フィールド名など）
    pub resource: Option<String>,
    /// エラー解決のための提案
    pub suggestion: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource: None,
            suggestion: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// バッチ処理の結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;

/// ストア操作の結果型
pub type StoreResult<T> = std::result::Result<T, StoreError>;

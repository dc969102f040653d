pub mod list;
pub mod process;
pub mod seed;

pub use list::*;
pub use process::*;
pub use seed::*;

use crate::core::{ItemStore, ProcessingError};
use crate::store::{JsonFileItemStore, MemoryItemStore};
use anyhow::{Context, Result};
use std::path::Path;

/// パス指定があればJSONストア、無ければメモリストアを開く
pub async fn open_store(path: Option<&Path>) -> Result<Box<dyn ItemStore>> {
    match path {
        Some(path) => {
            let store = JsonFileItemStore::open(path)
                .await
                .with_context(|| format!("Failed to open store: {}", path.display()))?;
            Ok(Box::new(store))
        }
        None => {
            tracing::info!("no --store given, using an in-memory store");
            Ok(Box::new(MemoryItemStore::new()))
        }
    }
}

/// エラーコンテキストをログに残し、解決の提案があれば付与して変換
pub fn with_error_context(error: ProcessingError) -> anyhow::Error {
    let context = error.context();
    tracing::error!(
        operation = %context.operation,
        resource = context.resource.as_deref(),
        severity = error.severity().as_str(),
        %error,
        "command failed"
    );

    match context.suggestion {
        Some(suggestion) => anyhow::Error::new(error).context(suggestion),
        None => anyhow::Error::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreError;

    #[test]
    fn test_with_error_context_adds_suggestion() {
        let error = with_error_context(ProcessingError::enumeration(StoreError::unavailable(
            "replica lagging",
        )));

        assert_eq!(error.to_string(), "ストアの接続状態を確認してください");
        assert!(format!("{error:#}").contains("replica lagging"));
    }

    #[test]
    fn test_with_error_context_without_suggestion() {
        let error = with_error_context(ProcessingError::item_processing(
            4,
            StoreError::conflict(4, "stale write"),
        ));

        assert!(error.to_string().contains("stale write"));
        assert!(error.downcast_ref::<ProcessingError>().is_some());
    }

    #[tokio::test]
    async fn test_open_store_defaults_to_memory() {
        let store = open_store(None).await.unwrap();
        assert!(store.list_all_ids().await.unwrap().is_empty());
    }
}

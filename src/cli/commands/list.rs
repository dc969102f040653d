use super::open_store;
use crate::core::{Item, ItemStore};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Execute list command
pub async fn execute_list_command(store: Option<PathBuf>) -> Result<Vec<Item>> {
    let store = open_store(store.as_deref()).await?;
    let items = store.find_all().await.context("Failed to list items")?;

    let json = serde_json::to_string_pretty(&items).context("Failed to serialize items")?;
    println!("{json}");

    Ok(items)
}

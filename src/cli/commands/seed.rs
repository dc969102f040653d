use super::open_store;
use crate::core::{Item, ItemStore};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Configuration struct for seed command
pub struct SeedConfig {
    pub store: Option<PathBuf>,
    pub count: usize,
    pub status: String,
}

/// Execute seed command
pub async fn execute_seed_command(config: SeedConfig) -> Result<Vec<Item>> {
    let store = open_store(config.store.as_deref()).await?;
    let created = seed_store(&store, config.count, &config.status).await?;

    println!(
        "Created {} items with status {}",
        created.len(),
        config.status
    );
    for item in &created {
        println!(
            "  - id={} name={}",
            item.id.map(|id| id.to_string()).unwrap_or_default(),
            item.name
        );
    }

    Ok(created)
}

/// 任意のストアへサンプルアイテムを保存
pub async fn seed_store<S>(store: &S, count: usize, status: &str) -> Result<Vec<Item>>
where
    S: ItemStore + ?Sized,
{
    let mut created = Vec::with_capacity(count);
    for index in 0..count {
        let item = Item::new(format!("item-{index}"), status)
            .with_description(format!("Seeded item #{index}"));
        let saved = store
            .save(item)
            .await
            .with_context(|| format!("Failed to save seeded item #{index}"))?;
        created.push(saved);
    }

    tracing::debug!(count = created.len(), "items seeded");
    Ok(created)
}

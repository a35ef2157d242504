use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::bootstrap::Services;

pub async fn upload(services: &Services, category: &str, path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let store = services.category_store().await;
    println!("{}", format!("Uploading {file_name}...").bright_black());
    let document = store.upload_document(category, bytes, file_name).await?;
    println!(
        "{}",
        format!("Uploaded '{}' into '{category}'", document.name).green()
    );
    Ok(())
}

pub async fn delete(services: &Services, category: &str, document: &str) -> Result<()> {
    let store = services.category_store().await;
    store.delete_document(category, document).await?;
    println!(
        "{}",
        format!("Deleted '{document}' from '{category}'").green()
    );
    Ok(())
}

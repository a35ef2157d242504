use anyhow::Result;
use colored::Colorize;
use docchat_application::LoadSource;

use crate::bootstrap::Services;

pub async fn list(services: &Services) -> Result<()> {
    let store = services.category_store().await;
    let categories = store.categories();
    if categories.is_empty() {
        println!("{}", "No categories.".bright_black());
        return Ok(());
    }
    for category in categories {
        println!("{}", category.name.bold());
        for document in &category.pdfs {
            println!(
                "  {} {}",
                document.name,
                document
                    .upload_date
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
        }
    }
    Ok(())
}

pub async fn add(services: &Services, name: &str) -> Result<()> {
    let store = services.category_store().await;
    let category = store.add_category(name).await?;
    println!("{}", format!("Created category '{}'", category.name).green());
    Ok(())
}

pub async fn delete(services: &Services, id: &str) -> Result<()> {
    let store = services.category_store().await;
    store.delete_category(id).await?;
    println!("{}", format!("Deleted category '{id}'").green());
    Ok(())
}

pub async fn refresh(services: &Services) -> Result<()> {
    let store = services.category_store().await;
    match store.refresh().await {
        LoadSource::Unavailable => anyhow::bail!(
            "backend unreachable at {}",
            services.config.normalized_base_url()
        ),
        _ => println!(
            "{}",
            format!("Loaded {} categories", store.categories().len()).green()
        ),
    }
    Ok(())
}

use anyhow::Result;
use colored::Colorize;

use super::print_message;
use crate::bootstrap::Services;

pub async fn show(services: &Services, category: &str) -> Result<()> {
    let sessions = services.history().sessions_or_welcome(category).await?;
    for session in sessions {
        println!(
            "{}",
            format!(
                "Session {} (started {})",
                session.id,
                session.start_time.format("%Y-%m-%d %H:%M:%S")
            )
            .bold()
        );
        for message in &session.messages {
            print_message(message);
        }
    }
    Ok(())
}

pub async fn delete(services: &Services, category: &str) -> Result<()> {
    services.history().delete(category).await?;
    println!("{}", format!("Deleted chat history for '{category}'").green());
    Ok(())
}

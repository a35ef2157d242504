use anyhow::Result;

use super::print_outcome;
use crate::bootstrap::Services;

pub async fn run(services: &Services, question: &str) -> Result<()> {
    let assistant = services.assistant();
    let outcome = assistant.send_message(question).await?;
    print_outcome(&outcome);
    Ok(())
}

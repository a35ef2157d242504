use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::{print_message, print_outcome};
use crate::bootstrap::Services;

/// Interactive session about one category. `/clear` ends the session.
pub async fn run(services: &Services, category: &str) -> Result<()> {
    let manager = services.session_manager();
    manager.select_category(category).await?;

    // Held for the lifetime of the loop; dropping it cancels a pending send.
    let transcript = manager.subscribe_messages();
    for message in transcript.current() {
        print_message(&message);
    }
    println!(
        "{}",
        "Type a question, '/clear' to end the session, or 'quit' to exit.".bright_black()
    );

    let mut rl = DefaultEditor::new()?;
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        match trimmed {
            "" => continue,
            "quit" | "exit" => break,
            "/clear" => {
                manager.clear();
                println!("{}", "Session cleared.".bright_yellow());
                return Ok(());
            }
            _ => {}
        }
        let _ = rl.add_history_entry(trimmed);

        match manager.send_message(trimmed).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(err) if err.is_validation() => eprintln!("{}", err.to_string().yellow()),
            Err(err) => return Err(err.into()),
        }
    }

    manager.clear();
    Ok(())
}

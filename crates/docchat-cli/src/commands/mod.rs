pub mod ask;
pub mod categories;
pub mod chat;
pub mod documents;
pub mod history;

use colored::Colorize;
use docchat_application::SendOutcome;
use docchat_core::chat::{ChatMessage, ChatSender};

/// Prints one transcript entry, user in green and assistant in blue.
pub(crate) fn print_message(message: &ChatMessage) {
    let time = message.timestamp.format("%H:%M:%S");
    match message.sender {
        ChatSender::User => {
            println!("{} {}", format!("[{time}] you>").green(), message.text);
        }
        ChatSender::Assistant => {
            println!("{}", format!("[{time}] assistant>").bright_blue());
            for line in message.text.lines() {
                println!("  {}", line.bright_blue());
            }
        }
    }
    if let Some(source) = &message.source {
        println!(
            "  {}",
            format!("source: {} (page {})", source.document_name, source.page_number).bright_black()
        );
        if let Some(text) = &source.matched_text {
            println!("  {}", format!("\"{text}\"").bright_black());
        }
    }
}

pub(crate) fn print_outcome(outcome: &SendOutcome) {
    print_message(outcome.reply());
    if let SendOutcome::Failed { error, .. } = outcome {
        eprintln!("{}", format!("({error})").red());
    }
}

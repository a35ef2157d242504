use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "DocChat CLI - organize documents into folders and chat about them", long_about = None)]
struct Cli {
    /// Keep the category snapshot in memory instead of on disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Upload or delete documents
    Documents {
        #[command(subcommand)]
        action: DocumentsAction,
    },
    /// Chat about a category's documents
    Chat {
        /// Category to open a session for
        category: String,
    },
    /// Ask the general assistant a single question
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Inspect or delete a category's chat history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List categories and their documents
    List,
    /// Create a category
    Add { name: String },
    /// Delete a category
    Delete { id: String },
    /// Reload categories from the backend
    Refresh,
}

#[derive(Subcommand)]
enum DocumentsAction {
    /// Upload a file into a category
    Upload {
        category: String,
        path: std::path::PathBuf,
    },
    /// Delete a document from a category
    Delete { category: String, document: String },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Print the reconciled history
    Show { category: String },
    /// Delete the history on the backend
    Delete { category: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("docchat=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let services = bootstrap::Services::build(cli.ephemeral)?;

    match cli.command {
        Commands::Categories { action } => match action {
            CategoriesAction::List => commands::categories::list(&services).await?,
            CategoriesAction::Add { name } => commands::categories::add(&services, &name).await?,
            CategoriesAction::Delete { id } => commands::categories::delete(&services, &id).await?,
            CategoriesAction::Refresh => commands::categories::refresh(&services).await?,
        },
        Commands::Documents { action } => match action {
            DocumentsAction::Upload { category, path } => {
                commands::documents::upload(&services, &category, &path).await?
            }
            DocumentsAction::Delete { category, document } => {
                commands::documents::delete(&services, &category, &document).await?
            }
        },
        Commands::Chat { category } => commands::chat::run(&services, &category).await?,
        Commands::Ask { question } => commands::ask::run(&services, &question.join(" ")).await?,
        Commands::History { action } => match action {
            HistoryAction::Show { category } => commands::history::show(&services, &category).await?,
            HistoryAction::Delete { category } => {
                commands::history::delete(&services, &category).await?
            }
        },
    }

    Ok(())
}

//! `mybooks` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration and start logging.
//! - Open the catalog database and dispatch to command handlers.

mod commands;
mod format;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use mybooks_core::db::open_db;
use mybooks_core::{init_logging, AppConfig, ConfigOverrides, SortOrder, Status};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "mybooks")]
#[command(version, about = "Catalog your books, reading dates, genres and quotes", long_about = None)]
struct Cli {
    /// SQLite database file (overrides MYBOOKS_DB and config.toml)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog entries
    Books {
        #[command(subcommand)]
        command: BookCommand,
    },
    /// Manage colored genres
    Genres {
        #[command(subcommand)]
        command: GenreCommand,
    },
    /// Manage quotes attached to a book
    Quotes {
        #[command(subcommand)]
        command: QuoteCommand,
    },
    /// Insert the sample catalog into an empty database
    Seed,
    /// Print the resolved configuration
    Config,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Books { .. } => "books",
            Self::Genres { .. } => "genres",
            Self::Quotes { .. } => "quotes",
            Self::Seed => "seed",
            Self::Config => "config",
        }
    }
}

#[derive(Subcommand)]
enum BookCommand {
    /// List books
    List {
        #[arg(long, value_enum, default_value_t = SortArg::DateAdded)]
        sort: SortArg,
        /// Case-insensitive match on title or author
        #[arg(long)]
        filter: Option<String>,
    },
    /// Add an on-shelf book
    Add { title: String, author: String },
    /// Show one book with genres and quote count
    Show { id: Uuid },
    /// Edit fields of one book
    Edit(EditArgs),
    /// Delete a book and its quotes
    Delete { id: Uuid },
}

#[derive(clap::Args, Default)]
struct EditArgs {
    id: Uuid,
    /// New reading status; started/completed dates follow it
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// 1-5 stars, 0 clears the rating
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    rating: Option<u8>,
    #[arg(long)]
    comment: Option<String>,
    #[arg(long)]
    recommended_by: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    added: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    started: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    completed: Option<String>,
}

#[derive(Subcommand)]
enum GenreCommand {
    /// List genres by name
    List,
    /// Create a genre with an RRGGBB color
    Add { name: String, color: String },
    /// Delete a genre and unlink it from books
    Delete { id: Uuid },
    /// Add the genre to the book, or remove it if already linked
    Toggle { book: Uuid, genre: Uuid },
}

#[derive(Subcommand)]
enum QuoteCommand {
    /// List a book's quotes, oldest first
    List { book: Uuid },
    /// Attach a quote to a book
    Add {
        book: Uuid,
        text: String,
        #[arg(long)]
        page: Option<String>,
    },
    /// Replace the text and page of a quote
    Edit {
        id: Uuid,
        text: String,
        #[arg(long)]
        page: Option<String>,
    },
    /// Delete a quote
    Delete { id: Uuid },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Title,
    Author,
    Status,
    DateAdded,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Title => SortOrder::Title,
            SortArg::Author => SortOrder::Author,
            SortArg::Status => SortOrder::Status,
            SortArg::DateAdded => SortOrder::DateAdded,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    OnShelf,
    InProgress,
    Completed,
}

impl From<StatusArg> for Status {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::OnShelf => Status::OnShelf,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Completed => Status::Completed,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(ConfigOverrides {
        db_path: cli.db.clone(),
        log_dir: cli.log_dir.clone(),
        log_level: cli.log_level.clone(),
    })
    .context("failed to resolve configuration")?;

    // Logging failures are reported, never fatal.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Commands::Config = cli.command {
        return format::print_config(&config, cli.json);
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;

    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );
    let ctx = commands::Context {
        conn: &conn,
        json: cli.json,
    };
    match cli.command {
        Commands::Books { command } => commands::run_books(&ctx, command),
        Commands::Genres { command } => commands::run_genres(&ctx, command),
        Commands::Quotes { command } => commands::run_quotes(&ctx, command),
        Commands::Seed => commands::run_seed(&ctx),
        Commands::Config => Ok(()),
    }
}

use bookshelf::model::BookStatus;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bookshelf",
    bin_name = "bookshelf",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Single-user library catalog manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Bookshelf home directory (defaults to $BOOKSHELF_HOME, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub home: Option<PathBuf>,

    /// Catalog file to use instead of the configured one
    #[arg(short, long, global = true, value_name = "FILE", help_heading = "Options")]
    pub file: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Book(BookCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Add a new book
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Title of the book
        title: String,

        /// Author of the book
        author: String,

        /// ISBN, unique within the catalog
        isbn: String,

        #[command(flatten)]
        details: BookDetails,
    },

    /// List all books
    #[command(alias = "ls", display_order = 2)]
    List,

    /// Show one book
    #[command(alias = "v", display_order = 3)]
    Show {
        /// Book id (a unique prefix is enough)
        id: String,
    },

    /// Search books by one field
    #[command(display_order = 4)]
    #[command(group(
        ArgGroup::new("field")
            .required(true)
            .args(["title", "author", "genre", "status"])
    ))]
    Search {
        /// Title contains (case-insensitive)
        #[arg(long)]
        title: Option<String>,

        /// Author contains (case-insensitive)
        #[arg(long)]
        author: Option<String>,

        /// Genre (exact, case-insensitive)
        #[arg(long)]
        genre: Option<String>,

        /// Exact status
        #[arg(long)]
        status: Option<BookStatus>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// Update fields of a book
    #[command(alias = "e", display_order = 10)]
    Update {
        /// Book id (a unique prefix is enough)
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        isbn: Option<String>,

        /// Set the status directly, bypassing lend/return rules
        #[arg(long)]
        status: Option<BookStatus>,

        #[command(flatten)]
        details: BookDetails,

        /// Remove the publication year
        #[arg(long, conflicts_with = "year")]
        clear_year: bool,
    },

    /// Lend an available book
    #[command(display_order = 11)]
    Lend { id: String },

    /// Return a borrowed book
    #[command(display_order = 12)]
    Return { id: String },

    /// Put a book into maintenance
    #[command(display_order = 13)]
    Maintenance { id: String },

    /// Delete a book
    #[command(alias = "rm", display_order = 14)]
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show catalog statistics
    #[command(display_order = 20)]
    Stats,

    /// Load the bundled sample books
    #[command(display_order = 21)]
    Samples,
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Interactive menu
    #[command(display_order = 30)]
    Menu,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (e.g., data-file)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Optional descriptive fields. On update an empty value clears a text field;
/// the year is cleared with `--clear-year`.
#[derive(Args, Debug, Default, Clone)]
pub struct BookDetails {
    #[arg(long)]
    pub genre: Option<String>,

    /// Publication year
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub publisher: Option<String>,

    /// Acquisition date (free text, e.g. 2024-05-01)
    #[arg(long)]
    pub acquired: Option<String>,

    /// Shelf location
    #[arg(long)]
    pub location: Option<String>,
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bookshelf={}", level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

//! # CLI Layer
//!
//! This module is **one possible UI client** for the catalog. It is not the
//! application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin prompts)
//! - Resolves the bookshelf home directory and the catalog file
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves paths, opens and loads the catalog
//! - `handle_*()`: Per-command handlers that call the API and print results
//! - `resolve_id()`: Maps a full id or a unique id prefix to a book

use super::menu;
use super::render::{
    info, render_book, render_book_list, render_stats, render_transition, success, warning,
};
use super::setup::{
    init_logging, BookCommands, BookDetails, Cli, Commands, CoreCommands, DataCommands,
    MiscCommands,
};
use bookshelf::api::CatalogApi;
use bookshelf::config::{CatalogConfig, HOME_ENV};
use bookshelf::error::{CatalogError, Result};
use bookshelf::model::{BookPatch, BookStatus, NewBook};
use bookshelf::store::fs::FsBackend;
use bookshelf::store::{LoadStatus, StorageBackend};
use clap::Parser;
use directories::ProjectDirs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info as log_info};
use uuid::Uuid;

struct AppContext {
    api: CatalogApi<FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let home = resolve_home(&cli)?;

    // Config does not need the catalog, so a broken catalog can still be repointed
    if let Some(Commands::Misc(MiscCommands::Config { key, value })) = &cli.command {
        return handle_config(&home, key.as_deref(), value.as_deref());
    }

    let mut ctx = init_context(&cli, &home)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Add {
                title,
                author,
                isbn,
                details,
            } => handle_add(&mut ctx, title, author, isbn, details),
            CoreCommands::List => handle_list(&ctx),
            CoreCommands::Show { id } => handle_show(&ctx, &id),
            CoreCommands::Search {
                title,
                author,
                genre,
                status,
            } => handle_search(&ctx, title, author, genre, status),
        },
        Some(Commands::Book(cmd)) => match cmd {
            BookCommands::Update {
                id,
                title,
                author,
                isbn,
                status,
                details,
                clear_year,
            } => {
                let patch = build_patch(title, author, isbn, status, details, clear_year);
                handle_update(&mut ctx, &id, patch)
            }
            BookCommands::Lend { id } => handle_lend(&mut ctx, &id),
            BookCommands::Return { id } => handle_return(&mut ctx, &id),
            BookCommands::Maintenance { id } => handle_maintenance(&mut ctx, &id),
            BookCommands::Delete { id, yes } => handle_delete(&mut ctx, &id, yes),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Stats => handle_stats(&ctx),
            DataCommands::Samples => handle_samples(&mut ctx),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Menu => handle_menu(&mut ctx),
            MiscCommands::Config { .. } => Ok(()),
        },
        None => handle_list(&ctx),
    }
}

/// `--home`, then `$BOOKSHELF_HOME`, then the OS data directory.
fn resolve_home(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    ProjectDirs::from("org", "bookshelf", "bookshelf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CatalogError::Store("Could not determine data directory".into()))
}

fn init_context(cli: &Cli, home: &std::path::Path) -> Result<AppContext> {
    let data_path = match &cli.file {
        Some(file) => file.clone(),
        None => CatalogConfig::load(home)?.data_path(home),
    };

    let (api, status) = CatalogApi::open(FsBackend::new(&data_path))?;
    match status {
        LoadStatus::Fresh => debug!(path = %data_path.display(), "starting a new catalog"),
        LoadStatus::Loaded(n) => log_info!(path = %data_path.display(), books = n, "catalog loaded"),
    }

    Ok(AppContext { api })
}

/// Find the book whose id is `input` or starts with it. Dashes are ignored,
/// so both the hyphenated id and the short form from `list` work.
pub(super) fn resolve_id<B: StorageBackend>(api: &CatalogApi<B>, input: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input.trim()) {
        return Ok(id);
    }

    let needle: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase();
    if needle.is_empty() {
        return Err(CatalogError::Api("Book id cannot be empty".into()));
    }

    let matches: Vec<Uuid> = api
        .list_books()
        .iter()
        .map(|b| b.id)
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CatalogError::Api(format!("No book matches id '{}'", input))),
        _ => Err(CatalogError::Api(format!(
            "Id '{}' is ambiguous ({} books match)",
            input,
            matches.len()
        ))),
    }
}

/// Blank strings count as absent on input.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// For updates an empty string clears an optional field.
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| if v.trim().is_empty() { None } else { Some(v) })
}

fn build_patch(
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    status: Option<BookStatus>,
    details: BookDetails,
    clear_year: bool,
) -> BookPatch {
    let publication_year = if clear_year {
        Some(None)
    } else {
        details.year.map(Some)
    };

    BookPatch {
        title,
        author,
        isbn,
        status,
        genre: clearable(details.genre),
        publication_year,
        publisher: clearable(details.publisher),
        acquisition_date: clearable(details.acquired),
        location: clearable(details.location),
    }
}

fn handle_add(
    ctx: &mut AppContext,
    title: String,
    author: String,
    isbn: String,
    details: BookDetails,
) -> Result<()> {
    let new_book = NewBook {
        genre: non_empty(details.genre),
        publication_year: details.year,
        publisher: non_empty(details.publisher),
        acquisition_date: non_empty(details.acquired),
        location: non_empty(details.location),
        ..NewBook::new(title, author, isbn)
    };

    let book = ctx.api.add_book(new_book)?;
    print!("{}", success(&format!("Added '{}'.", book.title)));
    print!("{}", render_book(&book));
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let books = ctx.api.list_books();
    if books.is_empty() {
        print!("{}", info("The catalog is empty. Try `bookshelf add` or `bookshelf samples`."));
        return Ok(());
    }
    print!("{}", render_book_list(&books));
    Ok(())
}

fn handle_show(ctx: &AppContext, input: &str) -> Result<()> {
    let id = resolve_id(&ctx.api, input)?;
    match ctx.api.get_book(&id) {
        Some(book) => print!("{}", render_book(&book)),
        None => print!("{}", warning(&format!("Book not found: {}", input))),
    }
    Ok(())
}

/// Clap guarantees exactly one field is set.
fn handle_search(
    ctx: &AppContext,
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    status: Option<BookStatus>,
) -> Result<()> {
    let books = match (title, author, genre, status) {
        (Some(term), ..) => ctx.api.search_by_title(&term),
        (_, Some(term), ..) => ctx.api.search_by_author(&term),
        (_, _, Some(genre), _) => ctx.api.search_by_genre(&genre),
        (_, _, _, Some(status)) => ctx.api.search_by_status(status),
        (None, None, None, None) => Vec::new(),
    };
    print!("{}", render_book_list(&books));
    Ok(())
}

fn handle_update(ctx: &mut AppContext, input: &str, patch: BookPatch) -> Result<()> {
    if patch.is_empty() {
        print!("{}", warning("Nothing to update."));
        return Ok(());
    }

    let id = resolve_id(&ctx.api, input)?;
    match ctx.api.update_book(&id, patch)? {
        Some(book) => {
            print!("{}", success(&format!("Updated '{}'.", book.title)));
            print!("{}", render_book(&book));
        }
        None => print!("{}", warning(&format!("Book not found: {}", input))),
    }
    Ok(())
}

fn handle_lend(ctx: &mut AppContext, input: &str) -> Result<()> {
    let id = resolve_id(&ctx.api, input)?;
    let outcome = ctx.api.lend_book(&id)?;
    print!("{}", render_transition(&outcome, "lend", "Lent"));
    Ok(())
}

fn handle_return(ctx: &mut AppContext, input: &str) -> Result<()> {
    let id = resolve_id(&ctx.api, input)?;
    let outcome = ctx.api.return_book(&id)?;
    print!("{}", render_transition(&outcome, "return", "Returned"));
    Ok(())
}

fn handle_maintenance(ctx: &mut AppContext, input: &str) -> Result<()> {
    let id = resolve_id(&ctx.api, input)?;
    let outcome = ctx.api.mark_maintenance(&id)?;
    print!(
        "{}",
        render_transition(&outcome, "send to maintenance", "Sent to maintenance")
    );
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, input: &str, yes: bool) -> Result<()> {
    let id = resolve_id(&ctx.api, input)?;
    let Some(book) = ctx.api.get_book(&id) else {
        print!("{}", warning(&format!("Book not found: {}", input)));
        return Ok(());
    };

    if !yes {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let question = format!("Delete '{}' by {}?", book.title, book.author);
        if !confirm(&mut stdin.lock(), &mut stdout, &question)? {
            print!("{}", info("Cancelled."));
            return Ok(());
        }
    }

    if ctx.api.delete_book(&id)? {
        print!("{}", success(&format!("Deleted '{}'.", book.title)));
    }
    Ok(())
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.api.statistics();
    print!(
        "{}",
        render_stats(&stats, ctx.api.metadata(), &ctx.api.location())
    );
    Ok(())
}

fn handle_samples(ctx: &mut AppContext) -> Result<()> {
    let books = ctx.api.load_samples()?;
    print!(
        "{}",
        success(&format!("Loaded {} sample books.", books.len()))
    );
    print!("{}", render_book_list(&books));
    Ok(())
}

fn handle_menu(ctx: &mut AppContext) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    menu::run_menu(&mut ctx.api, &mut stdin.lock(), &mut stdout)
}

fn handle_config(home: &std::path::Path, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut config = CatalogConfig::load(home)?;

    match (key, value) {
        (None, _) => {
            for key in CatalogConfig::keys() {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
            print!("{}", info(&format!("home: {}", home.display())));
        }
        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => return Err(CatalogError::Api(format!("Unknown config key: {}", key))),
        },
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save(home)?;
            print!("{}", success(&format!("{} = {}", key, value)));
        }
    }
    Ok(())
}

/// Ask a yes/no question; anything but `y`/`yes` is a no. End of input is a no.
pub(super) fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

//! Text rendering for the CLI and the interactive menu.
//!
//! Every function returns a `String` so the same output can go to stdout or
//! to the menu's writer.

use bookshelf::model::{Book, BookStatus};
use bookshelf::repository::{CatalogMetadata, Statistics, Transition};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use std::fmt::Write;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 8;
const STATUS_WIDTH: usize = 13;
const RULE: &str = "------------------------------------------------";

pub(super) fn success(msg: &str) -> String {
    format!("{}\n", msg.green())
}

pub(super) fn warning(msg: &str) -> String {
    format!("{}\n", msg.yellow())
}

pub(super) fn info(msg: &str) -> String {
    format!("{}\n", msg.dimmed())
}

fn status_colored(status: BookStatus) -> ColoredString {
    match status {
        BookStatus::Available => status.as_str().green(),
        BookStatus::Borrowed => status.as_str().yellow(),
        BookStatus::Maintenance => status.as_str().red(),
    }
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "N/A",
    }
}

/// Short form of a book id, enough to address it from the command line.
pub(super) fn short_id(book: &Book) -> String {
    book.id.simple().to_string()[..ID_WIDTH].to_string()
}

/// Full detail block for one book.
pub(super) fn render_book(book: &Book) -> String {
    let mut out = String::new();
    let year = book
        .publication_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "ID:        {}", book.id.to_string().dimmed());
    let _ = writeln!(out, "Title:     {}", book.title.bold());
    let _ = writeln!(out, "Author:    {}", book.author);
    let _ = writeln!(out, "ISBN:      {}", book.isbn);
    let _ = writeln!(out, "Status:    {}", status_colored(book.status));
    let _ = writeln!(out, "Genre:     {}", or_na(book.genre.as_deref()));
    let _ = writeln!(out, "Year:      {}", year);
    if let Some(publisher) = book.publisher.as_deref() {
        let _ = writeln!(out, "Publisher: {}", publisher);
    }
    if let Some(date) = book.acquisition_date.as_deref() {
        let _ = writeln!(out, "Acquired:  {}", date);
    }
    if let Some(location) = book.location.as_deref() {
        let _ = writeln!(out, "Location:  {}", location);
    }
    let _ = writeln!(out, "{}", RULE);
    out
}

/// One line per book: short id, status, then title and author truncated to fit.
pub(super) fn render_book_list(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found.\n".to_string();
    }

    let mut out = String::new();
    for book in books {
        let id = short_id(book);
        let status = book.status.as_str();
        let fixed = ID_WIDTH + 2 + STATUS_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);

        let text = truncate_to_width(&format!("{} by {}", book.title, book.author), available);
        let status_pad = STATUS_WIDTH.saturating_sub(status.width());

        let _ = writeln!(
            out,
            "{}  {}{}{}",
            id.yellow(),
            status_colored(book.status),
            " ".repeat(status_pad),
            text
        );
    }
    let _ = writeln!(out, "\n{} book(s)", books.len());
    out
}

pub(super) fn render_stats(stats: &Statistics, meta: &CatalogMetadata, location: &Path) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Catalog statistics".bold());
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Total books:  {}", stats.total);
    for status in BookStatus::all() {
        let label = format!("{}:", capitalize(status.as_str()));
        let _ = writeln!(out, "  {:<12}{}", label, stats.count(*status));
    }

    if !stats.by_genre.is_empty() {
        let _ = writeln!(out, "\nBy genre:");
        for (genre, count) in &stats.by_genre {
            let _ = writeln!(out, "  {:<24}{}", truncate_to_width(genre, 24), count);
        }
    }

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "{}",
        format!(
            "File: {} (v{}, updated {})",
            location.display(),
            meta.version,
            format_time_ago(meta.last_updated)
        )
        .dimmed()
    );
    out
}

/// Describe the outcome of lend / return / maintenance. `verb` is the
/// attempted action, `done` its past tense.
pub(super) fn render_transition(outcome: &Transition, verb: &str, done: &str) -> String {
    match outcome {
        Transition::Applied(book) => success(&format!(
            "{} '{}' (now {}).",
            done, book.title, book.status
        )),
        Transition::NotFound(id) => warning(&format!("Book not found: {}", id)),
        Transition::Rejected { book, expected } => warning(&format!(
            "Cannot {} '{}': it is {}, expected {}.",
            verb, book.title, book.status, expected
        )),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
}

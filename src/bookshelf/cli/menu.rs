//! Numbered interactive menu.
//!
//! Reads from any `BufRead` and writes to any `Write`, so tests drive it with
//! in-memory buffers. An error inside one action is printed and the loop goes
//! on; end of input leaves the menu.

use super::commands::{confirm, resolve_id};
use super::render::{
    info, render_book, render_book_list, render_stats, render_transition, success, warning,
};
use bookshelf::api::CatalogApi;
use bookshelf::error::Result;
use bookshelf::model::{BookPatch, NewBook};
use bookshelf::store::StorageBackend;
use colored::Colorize;
use std::io::{BufRead, Write};
use tracing::debug;

const MENU: &str = "
====== Bookshelf ======
 1. Add a book
 2. List all books
 3. Find a book by id
 4. Search by title
 5. Search by author
 6. Update a book
 7. Lend a book
 8. Return a book
 9. Send a book to maintenance
10. Delete a book
11. Statistics
12. Load sample books
 0. Quit
";

pub(super) fn run_menu<B, R, W>(api: &mut CatalogApi<B>, input: &mut R, out: &mut W) -> Result<()>
where
    B: StorageBackend,
    R: BufRead,
    W: Write,
{
    let mut menu = Menu { api, input, out };
    menu.run()
}

struct Menu<'a, B: StorageBackend, R, W> {
    api: &'a mut CatalogApi<B>,
    input: &'a mut R,
    out: &'a mut W,
}

impl<B: StorageBackend, R: BufRead, W: Write> Menu<'_, B, R, W> {
    fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "{}", MENU)?;
            let Some(choice) = self.ask("Choose an option: ")? else {
                writeln!(self.out)?;
                return Ok(());
            };

            let outcome = match choice.as_str() {
                "1" => self.add(),
                "2" => self.list(),
                "3" => self.find_by_id(),
                "4" => self.search_title(),
                "5" => self.search_author(),
                "6" => self.update(),
                "7" => self.lend(),
                "8" => self.give_back(),
                "9" => self.maintenance(),
                "10" => self.delete(),
                "11" => self.stats(),
                "12" => self.samples(),
                "0" => {
                    write!(self.out, "{}", info("Goodbye."))?;
                    return Ok(());
                }
                other => {
                    debug!(choice = other, "invalid menu option");
                    write!(self.out, "{}", warning("Invalid option, try again."))?;
                    Ok(())
                }
            };

            if let Err(err) = outcome {
                writeln!(self.out, "{}", format!("Error: {}", err).red())?;
            }
        }
    }

    /// Prompt and read one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_text(&mut self, prompt: &str) -> Result<String> {
        Ok(self.ask(prompt)?.unwrap_or_default())
    }

    fn ask_optional(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(self.ask(prompt)?.filter(|s| !s.is_empty()))
    }

    fn header(&mut self, title: &str) -> Result<()> {
        writeln!(self.out, "\n--- {} ---", title.bold())?;
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        self.header("Add a book")?;
        let title = self.ask_text("Title: ")?;
        let author = self.ask_text("Author: ")?;
        let isbn = self.ask_text("ISBN: ")?;
        let genre = self.ask_optional("Genre (optional): ")?;
        let year = self.ask_optional("Publication year (optional): ")?;

        let publication_year = match year {
            Some(raw) => match raw.parse::<i32>() {
                Ok(y) => Some(y),
                Err(_) => {
                    write!(self.out, "{}", warning("Not a year, leaving it empty."))?;
                    None
                }
            },
            None => None,
        };

        let book = self.api.add_book(NewBook {
            genre,
            publication_year,
            ..NewBook::new(title, author, isbn)
        })?;
        write!(self.out, "{}", success("Book added."))?;
        write!(self.out, "{}", render_book(&book))?;
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        self.header("All books")?;
        let books = self.api.list_books();
        write!(self.out, "{}", render_book_list(&books))?;
        Ok(())
    }

    fn find_by_id(&mut self) -> Result<()> {
        self.header("Find a book by id")?;
        let raw = self.ask_text("Book id: ")?;
        let id = resolve_id(self.api, &raw)?;
        match self.api.get_book(&id) {
            Some(book) => write!(self.out, "{}", render_book(&book))?,
            None => write!(self.out, "{}", warning("Book not found."))?,
        }
        Ok(())
    }

    fn search_title(&mut self) -> Result<()> {
        self.header("Search by title")?;
        let term = self.ask_text("Title contains: ")?;
        let books = self.api.search_by_title(&term);
        write!(self.out, "{}", render_book_list(&books))?;
        Ok(())
    }

    fn search_author(&mut self) -> Result<()> {
        self.header("Search by author")?;
        let term = self.ask_text("Author contains: ")?;
        let books = self.api.search_by_author(&term);
        write!(self.out, "{}", render_book_list(&books))?;
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        self.header("Update a book")?;
        let raw = self.ask_text("Book id: ")?;
        let id = resolve_id(self.api, &raw)?;
        let Some(book) = self.api.get_book(&id) else {
            write!(self.out, "{}", warning("Book not found."))?;
            return Ok(());
        };

        writeln!(self.out, "Enter new values (leave blank to keep):")?;
        let title = self.ask_optional(&format!("Title [{}]: ", book.title))?;
        let author = self.ask_optional(&format!("Author [{}]: ", book.author))?;

        let patch = BookPatch {
            title,
            author,
            ..Default::default()
        };
        if patch.is_empty() {
            write!(self.out, "{}", info("Nothing changed."))?;
            return Ok(());
        }

        if let Some(updated) = self.api.update_book(&id, patch)? {
            write!(self.out, "{}", success("Book updated."))?;
            write!(self.out, "{}", render_book(&updated))?;
        }
        Ok(())
    }

    fn lend(&mut self) -> Result<()> {
        self.header("Lend a book")?;
        let raw = self.ask_text("Book id: ")?;
        let id = resolve_id(self.api, &raw)?;
        let outcome = self.api.lend_book(&id)?;
        write!(self.out, "{}", render_transition(&outcome, "lend", "Lent"))?;
        Ok(())
    }

    fn give_back(&mut self) -> Result<()> {
        self.header("Return a book")?;
        let raw = self.ask_text("Book id: ")?;
        let id = resolve_id(self.api, &raw)?;
        let outcome = self.api.return_book(&id)?;
        write!(self.out, "{}", render_transition(&outcome, "return", "Returned"))?;
        Ok(())
    }

    fn maintenance(&mut self) -> Result<()> {
        self.header("Send a book to maintenance")?;
        let raw = self.ask_text("Book id: ")?;
        let id = resolve_id(self.api, &raw)?;
        let outcome = self.api.mark_maintenance(&id)?;
        write!(
            self.out,
            "{}",
            render_transition(&outcome, "send to maintenance", "Sent to maintenance")
        )?;
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.header("Delete a book")?;
        let raw = self.ask_text("Book id: ")?;
        let id = resolve_id(self.api, &raw)?;

        let question = format!("Really delete the book with id {}?", id);
        if !confirm(self.input, self.out, &question)? {
            write!(self.out, "{}", info("Cancelled."))?;
            return Ok(());
        }

        if self.api.delete_book(&id)? {
            write!(self.out, "{}", success("Book deleted."))?;
        } else {
            write!(self.out, "{}", warning("Book not found."))?;
        }
        Ok(())
    }

    fn stats(&mut self) -> Result<()> {
        self.header("Statistics")?;
        let stats = self.api.statistics();
        let location = self.api.location();
        write!(
            self.out,
            "{}",
            render_stats(&stats, self.api.metadata(), &location)
        )?;
        Ok(())
    }

    fn samples(&mut self) -> Result<()> {
        self.header("Load sample books")?;
        if !confirm(self.input, self.out, "This adds sample books to the catalog. Continue?")? {
            write!(self.out, "{}", info("Cancelled."))?;
            return Ok(());
        }

        let books = self.api.load_samples()?;
        write!(
            self.out,
            "{}",
            success(&format!("Loaded {} sample books.", books.len()))
        )?;
        Ok(())
    }
}

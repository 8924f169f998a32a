//! Command handlers over core services.

use crate::format::{self, parse_date, same_local_day};
use crate::{BookCommand, EditArgs, GenreCommand, QuoteCommand};
use anyhow::{bail, Result};
use mybooks_core::{
    now_epoch_ms, seed_samples, BookService, EditBook, GenreService, QuoteService,
    SqliteBookRepository, SqliteGenreRepository, SqliteQuoteRepository, UpdateOutcome,
};
use rusqlite::Connection;

pub struct Context<'conn> {
    pub conn: &'conn Connection,
    pub json: bool,
}

impl<'conn> Context<'conn> {
    fn books(&self) -> BookService<SqliteBookRepository<'conn>> {
        BookService::new(SqliteBookRepository::new(self.conn))
    }

    fn genres(&self) -> GenreService<SqliteGenreRepository<'conn>> {
        GenreService::new(SqliteGenreRepository::new(self.conn))
    }

    fn quotes(&self) -> QuoteService<SqliteQuoteRepository<'conn>> {
        QuoteService::new(SqliteQuoteRepository::new(self.conn))
    }
}

pub fn run_books(ctx: &Context<'_>, command: BookCommand) -> Result<()> {
    let books = ctx.books();
    match command {
        BookCommand::List { sort, filter } => {
            let records = books.list_books(sort.into(), filter)?;
            format::print_books(&records, ctx.json)
        }
        BookCommand::Add { title, author } => {
            let record = books.create_book(&title, &author, now_epoch_ms())?;
            format::print_book(&record, ctx.json)
        }
        BookCommand::Show { id } => match books.get_book(id)? {
            Some(record) => format::print_book(&record, ctx.json),
            None => bail!("book not found: {id}"),
        },
        BookCommand::Edit(args) => edit_book(ctx, args),
        BookCommand::Delete { id } => {
            books.delete_book(id)?;
            format::print_message(&format!("Deleted book {id}."), ctx.json)
        }
    }
}

fn edit_book(ctx: &Context<'_>, args: EditArgs) -> Result<()> {
    let books = ctx.books();
    let mut draft = books.edit_book(args.id)?;
    apply_edit(&mut draft, &args, now_epoch_ms())?;

    match books.update_book(&draft)? {
        UpdateOutcome::Updated(record) => format::print_book(&record, ctx.json),
        UpdateOutcome::Unchanged => format::print_message("No changes.", ctx.json),
    }
}

/// Applies command-line edits to a draft.
///
/// Dates keep the field's current time of day. A date on the same day as
/// its bound is moved onto the bound.
fn apply_edit(draft: &mut EditBook, args: &EditArgs, now_ms: i64) -> Result<()> {
    if let Some(status) = args.status {
        draft.set_status(status.into(), now_ms);
    }
    if let Some(title) = &args.title {
        draft.title = title.clone();
    }
    if let Some(author) = &args.author {
        draft.author = author.clone();
    }
    if let Some(rating) = args.rating {
        draft.rating = (rating > 0).then_some(rating);
    }
    if let Some(comment) = &args.comment {
        draft.comment = comment.clone();
    }
    if let Some(recommended_by) = &args.recommended_by {
        draft.recommended_by = recommended_by.clone();
    }
    if let Some(added) = args.added.as_deref() {
        let value = parse_date(added, Some(draft.date_added))?;
        draft.date_added = lower_within_day(value, draft.date_bounds().added_max);
    }
    if let Some(started) = args.started.as_deref() {
        if !draft.status().shows_started() {
            bail!("started date is only editable while in progress or completed");
        }
        let value = parse_date(started, draft.date_started)?;
        draft.date_started = Some(raise_within_day(value, draft.date_bounds().started_min));
    }
    if let Some(completed) = args.completed.as_deref() {
        if !draft.status().shows_completed() {
            bail!("completed date is only editable while completed");
        }
        let value = parse_date(completed, draft.date_completed)?;
        draft.date_completed = Some(raise_within_day(
            value,
            draft.date_bounds().completed_min,
        ));
    }
    Ok(())
}

fn raise_within_day(value: i64, min: Option<i64>) -> i64 {
    match min {
        Some(min) if value < min && same_local_day(value, min) => min,
        _ => value,
    }
}

fn lower_within_day(value: i64, max: Option<i64>) -> i64 {
    match max {
        Some(max) if value > max && same_local_day(value, max) => max,
        _ => value,
    }
}

pub fn run_genres(ctx: &Context<'_>, command: GenreCommand) -> Result<()> {
    let genres = ctx.genres();
    match command {
        GenreCommand::List => format::print_genres(&genres.list_genres()?, ctx.json),
        GenreCommand::Add { name, color } => {
            let genre = genres.create_genre(&name, &color)?;
            format::print_genres(std::slice::from_ref(&genre), ctx.json)
        }
        GenreCommand::Delete { id } => {
            genres.delete_genre(id)?;
            format::print_message(&format!("Deleted genre {id}."), ctx.json)
        }
        GenreCommand::Toggle { book, genre } => {
            let linked = genres.toggle_book_genre(book, genre)?;
            format::print_genres(&linked, ctx.json)
        }
    }
}

pub fn run_quotes(ctx: &Context<'_>, command: QuoteCommand) -> Result<()> {
    let quotes = ctx.quotes();
    match command {
        QuoteCommand::List { book } => format::print_quotes(&quotes.list_quotes(book)?, ctx.json),
        QuoteCommand::Add { book, text, page } => {
            let quote = quotes.create_quote(book, &text, page.as_deref(), now_epoch_ms())?;
            format::print_quotes(std::slice::from_ref(&quote), ctx.json)
        }
        QuoteCommand::Edit { id, text, page } => {
            let quote = quotes.update_quote(id, &text, page.as_deref())?;
            format::print_quotes(std::slice::from_ref(&quote), ctx.json)
        }
        QuoteCommand::Delete { id } => {
            quotes.delete_quote(id)?;
            format::print_message(&format!("Deleted quote {id}."), ctx.json)
        }
    }
}

pub fn run_seed(ctx: &Context<'_>) -> Result<()> {
    let report = seed_samples(ctx.conn, now_epoch_ms())?;
    if report.is_empty() {
        return format::print_message("Catalog is not empty; nothing seeded.", ctx.json);
    }
    format::print_message(
        &format!(
            "Seeded {} books, {} genres, {} quotes.",
            report.books, report.genres, report.quotes
        ),
        ctx.json,
    )
}

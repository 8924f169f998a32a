//! Text and JSON rendering plus date conversion for the CLI.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use mybooks_core::{AppConfig, BookRecord, Genre, Quote, MAX_RATING};
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

/// Parses `YYYY-MM-DD` as a local date in epoch milliseconds.
///
/// The time of day is taken from `keep_time_of` when given, else midnight.
pub fn parse_date(value: &str, keep_time_of: Option<i64>) -> Result<i64> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|err| anyhow!("invalid date `{value}` (expected YYYY-MM-DD): {err}"))?;
    let time = keep_time_of
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|existing| existing.time())
        .or_else(|| NaiveTime::from_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("invalid date `{value}`"))?;
    let local = Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| anyhow!("date `{value}` does not exist in the local time zone"))?;
    Ok(local.timestamp_millis())
}

/// Whether both instants fall on the same local calendar day.
pub fn same_local_day(left_ms: i64, right_ms: i64) -> bool {
    let day = |ms: i64| Local.timestamp_millis_opt(ms).single().map(|dt| dt.date_naive());
    match (day(left_ms), day(right_ms)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Formats epoch milliseconds as a local `YYYY-MM-DD` date.
pub fn format_date(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(value) => value.format(DATE_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

fn stars(rating: Option<u8>) -> String {
    let filled = usize::from(rating.unwrap_or(0));
    let empty = usize::from(MAX_RATING).saturating_sub(filled);
    format!("{}{}", "*".repeat(filled), ".".repeat(empty))
}

fn genre_names(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|genre| format!("{} {}", genre.name, genre.color))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_message(message: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&Message { message });
    }
    println!("{message}");
    Ok(())
}

pub fn print_books(records: &[BookRecord], json: bool) -> Result<()> {
    if json {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No books yet.");
        return Ok(());
    }
    for record in records {
        let book = &record.book;
        println!(
            "{}  {:<11}  {}  {} by {}",
            book.id,
            book.status.label(),
            stars(book.rating),
            book.title,
            book.author
        );
        if !record.genres.is_empty() {
            println!("    genres: {}", genre_names(&record.genres));
        }
    }
    Ok(())
}

pub fn print_book(record: &BookRecord, json: bool) -> Result<()> {
    if json {
        return print_json(record);
    }
    let book = &record.book;
    println!("{}", book.title);
    println!("  id:             {}", book.id);
    println!("  author:         {}", book.author);
    println!("  status:         {}", book.status.label());
    println!("  rating:         {}", stars(book.rating));
    println!("  date added:     {}", format_date(book.date_added));
    if book.status.shows_started() {
        if let Some(started) = book.date_started {
            println!("  date started:   {}", format_date(started));
        }
    }
    if book.status.shows_completed() {
        if let Some(completed) = book.date_completed {
            println!("  date completed: {}", format_date(completed));
        }
    }
    if !book.recommended_by.is_empty() {
        println!("  recommended by: {}", book.recommended_by);
    }
    if !record.genres.is_empty() {
        println!("  genres:         {}", genre_names(&record.genres));
    }
    println!("  quotes:         {}", record.quote_count);
    if !book.comment.is_empty() {
        println!();
        println!("{}", book.comment);
    }
    Ok(())
}

pub fn print_genres(genres: &[Genre], json: bool) -> Result<()> {
    if json {
        return print_json(genres);
    }
    if genres.is_empty() {
        println!("No genres.");
        return Ok(());
    }
    for genre in genres {
        println!("{}  {}  {}", genre.id, genre.color, genre.name);
    }
    Ok(())
}

pub fn print_quotes(quotes: &[Quote], json: bool) -> Result<()> {
    if json {
        return print_json(quotes);
    }
    if quotes.is_empty() {
        println!("No quotes.");
        return Ok(());
    }
    for quote in quotes {
        println!("{}  {}", quote.id, format_date(quote.creation_date));
        println!("    {}", quote.text);
        if let Some(page) = quote.page.as_deref() {
            println!("    Page: {page}");
        }
    }
    Ok(())
}

pub fn print_config(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        return print_json(config);
    }
    println!("db_path   = {}", config.db_path.display());
    println!("log_dir   = {}", config.log_dir.display());
    println!("log_level = {}", config.log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_date, parse_date, same_local_day, stars};

    const HOUR_MS: i64 = 60 * 60 * 1000;

    #[test]
    fn parse_then_format_keeps_calendar_date() {
        let ms = parse_date("2024-03-15", None).unwrap();
        assert_eq!(format_date(ms), "2024-03-15");
    }

    #[test]
    fn parse_keeps_time_of_day_from_existing_value() {
        let afternoon = parse_date("2024-03-15", None).unwrap() + 14 * HOUR_MS;
        let moved = parse_date("2024-03-18", Some(afternoon)).unwrap();
        assert_eq!(format_date(moved), "2024-03-18");
        assert_eq!(
            moved - parse_date("2024-03-18", None).unwrap(),
            14 * HOUR_MS
        );
    }

    #[test]
    fn same_local_day_compares_calendar_dates() {
        let midnight = parse_date("2024-03-15", None).unwrap();
        assert!(same_local_day(midnight, midnight + 20 * HOUR_MS));
        assert!(!same_local_day(midnight, parse_date("2024-03-16", None).unwrap()));
    }

    #[test]
    fn parse_rejects_other_layouts() {
        assert!(parse_date("15/03/2024", None).is_err());
        assert!(parse_date("2024-02-30", None).is_err());
    }

    #[test]
    fn stars_pad_to_max_rating() {
        assert_eq!(stars(Some(3)), "***..");
        assert_eq!(stars(None), ".....");
    }
}

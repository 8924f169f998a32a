//! Unicode-aware text folding registered on every catalog connection.
//!
//! SQLite's built-in `NOCASE` and `LIKE` fold ASCII only. Catalog titles,
//! authors and genre names are compared through these instead:
//! - `UNICODE_NOCASE` collation: orders by `str::to_lowercase`.
//! - `unicode_lower(text)` scalar function: lowercases its argument.

use super::DbResult;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::cmp::Ordering;

pub const UNICODE_NOCASE: &str = "UNICODE_NOCASE";
pub const UNICODE_LOWER_FN: &str = "unicode_lower";

/// Registers the folding collation and function. Safe to call repeatedly.
pub fn register_text_folding(conn: &Connection) -> DbResult<()> {
    conn.create_collation(UNICODE_NOCASE, compare_folded)?;
    conn.create_scalar_function(
        UNICODE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| fold(&text)))
        },
    )?;
    Ok(())
}

/// Case-folds text the same way SQL comparisons do.
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

fn compare_folded(left: &str, right: &str) -> Ordering {
    fold(left).cmp(&fold(right))
}

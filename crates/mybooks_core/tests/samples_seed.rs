use mybooks_core::db::open_db_in_memory;
use mybooks_core::samples::{sample_books, SAMPLE_GENRES};
use mybooks_core::{
    seed_samples, BookService, GenreService, SortOrder, SqliteBookRepository,
    SqliteGenreRepository, Status,
};

const NOW: i64 = 1_710_460_800_000;

#[test]
fn sample_books_are_valid() {
    for book in sample_books(NOW) {
        book.validate().unwrap();
    }
}

#[test]
fn seeding_empty_catalog_inserts_everything_once() {
    let conn = open_db_in_memory().unwrap();

    let report = seed_samples(&conn, NOW).unwrap();
    assert_eq!(report.genres, SAMPLE_GENRES.len());
    assert_eq!(report.books, sample_books(NOW).len());
    assert_eq!(report.quotes, 2);

    let again = seed_samples(&conn, NOW).unwrap();
    assert!(again.is_empty());

    let books = BookService::new(SqliteBookRepository::new(&conn));
    let listed = books.list_books(SortOrder::Status, None).unwrap();
    assert_eq!(listed.len(), report.books);
    assert_eq!(listed[0].book.status, Status::OnShelf);
    assert_eq!(listed.last().unwrap().book.status, Status::Completed);
    assert!(listed.iter().all(|record| !record.genres.is_empty()));
    assert_eq!(
        listed.iter().map(|record| record.quote_count).sum::<u32>(),
        2
    );
}

#[test]
fn failed_seed_leaves_catalog_empty_and_retryable() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TEMP TRIGGER reject_quotes BEFORE INSERT ON quotes
         BEGIN SELECT RAISE(ABORT, 'quotes disabled'); END;",
    )
    .unwrap();

    assert!(seed_samples(&conn, NOW).is_err());

    let books = BookService::new(SqliteBookRepository::new(&conn));
    let genres = GenreService::new(SqliteGenreRepository::new(&conn));
    assert_eq!(books.count_books().unwrap(), 0);
    assert!(genres.list_genres().unwrap().is_empty());

    conn.execute_batch("DROP TRIGGER reject_quotes;").unwrap();
    let report = seed_samples(&conn, NOW).unwrap();
    assert_eq!(report.books, sample_books(NOW).len());
    assert_eq!(report.quotes, 2);
}

#[test]
fn sample_genre_colors_match_expected_hex() {
    let conn = open_db_in_memory().unwrap();
    seed_samples(&conn, NOW).unwrap();

    let genres = GenreService::new(SqliteGenreRepository::new(&conn));
    let pairs: Vec<(String, String)> = genres
        .list_genres()
        .unwrap()
        .into_iter()
        .map(|genre| (genre.name, genre.color.to_hex()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Fiction".to_string(), "00FF00".to_string()),
            ("Non Fiction".to_string(), "0000FF".to_string()),
            ("Romance".to_string(), "FF0000".to_string()),
            ("Thriller".to_string(), "000000".to_string()),
        ]
    );
}

#[test]
fn book_record_serializes_flat_with_snake_case_status() {
    let conn = open_db_in_memory().unwrap();
    seed_samples(&conn, NOW).unwrap();
    let books = BookService::new(SqliteBookRepository::new(&conn));
    let record = books
        .list_books(SortOrder::Title, Some("hobbit".to_string()))
        .unwrap()
        .remove(0);

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["title"], "The Hobbit");
    assert_eq!(value["status"], "completed");
    assert_eq!(value["quote_count"], 2);
    assert_eq!(value["genres"][0]["color"], "00FF00");
}

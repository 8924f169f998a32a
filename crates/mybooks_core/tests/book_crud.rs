use mybooks_core::db::open_db_in_memory;
use mybooks_core::{
    Book, BookRepository, BookService, BookServiceError, BookValidationError, Entity, RepoError,
    SortOrder, SqliteBookRepository, Status,
};
use rusqlite::Connection;
use uuid::Uuid;

fn add(conn: &Connection, title: &str, author: &str, added: i64) -> Book {
    let book = Book::new(title, author, added);
    SqliteBookRepository::new(conn).create_book(&book).unwrap();
    book
}

fn titles(conn: &Connection, sort: SortOrder, filter: Option<&str>) -> Vec<String> {
    let service = BookService::new(SqliteBookRepository::new(conn));
    service
        .list_books(sort, filter.map(str::to_string))
        .unwrap()
        .into_iter()
        .map(|record| record.book.title)
        .collect()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::new(&conn));

    let created = service.create_book(" Dune ", "Frank Herbert", 1_000).unwrap();
    assert_eq!(created.book.title, "Dune");
    assert_eq!(created.book.status, Status::OnShelf);
    assert_eq!(created.quote_count, 0);
    assert!(created.genres.is_empty());

    let loaded = service.get_book(created.book.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_blank_author() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::new(&conn));

    let err = service.create_book("Title", "   ", 0).unwrap_err();
    assert!(matches!(
        err,
        BookServiceError::Invalid(BookValidationError::BlankAuthor)
    ));
}

#[test]
fn list_sorts_by_each_order() {
    let conn = open_db_in_memory().unwrap();
    add(&conn, "banana", "Zed", 3_000);
    add(&conn, "Apple", "yves", 1_000);
    let mut reading = Book::new("cherry", "Xavier", 2_000);
    reading.set_status(Status::InProgress, 2_500);
    SqliteBookRepository::new(&conn)
        .create_book(&reading)
        .unwrap();

    assert_eq!(
        titles(&conn, SortOrder::Title, None),
        vec!["Apple", "banana", "cherry"]
    );
    assert_eq!(
        titles(&conn, SortOrder::Author, None),
        vec!["cherry", "Apple", "banana"]
    );
    assert_eq!(
        titles(&conn, SortOrder::Status, None),
        vec!["Apple", "banana", "cherry"]
    );
    assert_eq!(
        titles(&conn, SortOrder::DateAdded, None),
        vec!["banana", "cherry", "Apple"]
    );
}

#[test]
fn filter_matches_title_or_author_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    add(&conn, "The Hobbit", "J. R. R. Tolkien", 1);
    add(&conn, "Emma", "Jane Austen", 2);
    add(&conn, "100% Wolf", "Jayne Lyons", 3);

    assert_eq!(
        titles(&conn, SortOrder::Title, Some("HOB")),
        vec!["The Hobbit"]
    );
    assert_eq!(titles(&conn, SortOrder::Title, Some("austen")), vec!["Emma"]);
    assert_eq!(
        titles(&conn, SortOrder::Title, Some("0%")),
        vec!["100% Wolf"]
    );
    assert_eq!(titles(&conn, SortOrder::Title, Some("   ")).len(), 3);
    assert!(titles(&conn, SortOrder::Title, Some("missing")).is_empty());
}

#[test]
fn filter_folds_case_of_accented_letters() {
    let conn = open_db_in_memory().unwrap();
    add(&conn, "Élan vital", "Henri Bergson", 1);
    add(&conn, "Die Verwandlung", "Franz Kafka", 2);
    add(&conn, "Записки из подполья", "Фёдор Достоевский", 3);

    assert_eq!(
        titles(&conn, SortOrder::Title, Some("élan")),
        vec!["Élan vital"]
    );
    assert_eq!(
        titles(&conn, SortOrder::Title, Some("ДОСТОЕВСКИЙ")),
        vec!["Записки из подполья"]
    );
    assert!(titles(&conn, SortOrder::Title, Some("elan")).is_empty());
}

#[test]
fn title_sort_folds_case_of_accented_letters() {
    let conn = open_db_in_memory().unwrap();
    add(&conn, "éb", "A", 1);
    add(&conn, "Éc", "A", 2);
    add(&conn, "Éa", "A", 3);
    add(&conn, "Zed", "A", 4);

    assert_eq!(
        titles(&conn, SortOrder::Title, None),
        vec!["Zed", "Éa", "éb", "Éc"]
    );
}

#[test]
fn update_missing_book_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::new(&conn);

    let book = Book::new("Ghost", "Nobody", 0);
    let err = repo.update_book(&book).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { entity: Entity::Book, id } if id == book.id
    ));
}

#[test]
fn delete_missing_book_maps_to_book_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::new(&conn));

    let id = Uuid::new_v4();
    let err = service.delete_book(id).unwrap_err();
    assert!(matches!(err, BookServiceError::BookNotFound(missing) if missing == id));
}

#[test]
fn invalid_persisted_status_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let book = add(&conn, "Broken", "Row", 0);
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE books SET status = 7 WHERE uuid = ?1;",
        [book.id.to_string()],
    )
    .unwrap();

    let err = SqliteBookRepository::new(&conn)
        .get_book(book.id)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

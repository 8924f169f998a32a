use mybooks_core::db::migrations::{apply_migrations, apply_migrations_up_to, latest_version};
use mybooks_core::db::{open_db, open_db_in_memory, DbError};
use mybooks_core::{BookRepository, SqliteBookRepository, Status};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["books", "genres", "book_genres", "quotes"] {
        assert_table_exists(&conn, table);
    }
    assert!(table_has_column(&conn, "books", "comment"));
    assert!(table_has_column(&conn, "books", "recommended_by"));
    assert!(!table_has_column(&conn, "books", "summary"));

    let unicode_index: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'index' AND name = 'idx_genres_name_unicode';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(unicode_index, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mybooks.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "books");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn upgrade_from_v1_keeps_legacy_summary_as_comment() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    apply_migrations_up_to(&mut conn, 1).unwrap();
    assert_eq!(schema_version(&conn), 1);

    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO books (uuid, title, author, date_added, summary, status)
         VALUES (?1, 'Legacy', 'Old Author', 1000, 'kept note', 0);",
        [id.to_string()],
    )
    .unwrap();

    apply_migrations(&mut conn).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let repo = SqliteBookRepository::new(&conn);
    let book = repo.get_book(id).unwrap().unwrap();
    assert_eq!(book.comment, "kept note");
    assert_eq!(book.recommended_by, "");
    assert_eq!(book.status, Status::OnShelf);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> bool {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names.iter().any(|name| name == column)
}

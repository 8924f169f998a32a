use mybooks_core::db::open_db_in_memory;
use mybooks_core::{
    BookService, Genre, GenreColor, GenreRepository, GenreService, GenreServiceError, RepoError,
    SqliteBookRepository, SqliteGenreRepository,
};
use uuid::Uuid;

#[test]
fn create_genre_normalizes_color_and_lists_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = GenreService::new(SqliteGenreRepository::new(&conn));

    service.create_genre("thriller", "#000000").unwrap();
    let fiction = service.create_genre(" Fiction ", "00ff00").unwrap();
    assert_eq!(fiction.name, "Fiction");
    assert_eq!(fiction.color.to_hex(), "00FF00");

    let names: Vec<String> = service
        .list_genres()
        .unwrap()
        .into_iter()
        .map(|genre| genre.name)
        .collect();
    assert_eq!(names, vec!["Fiction", "thriller"]);
}

#[test]
fn create_genre_rejects_blank_bad_color_and_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let service = GenreService::new(SqliteGenreRepository::new(&conn));

    assert!(matches!(
        service.create_genre("  ", "FF0000"),
        Err(GenreServiceError::InvalidName)
    ));
    assert!(matches!(
        service.create_genre("Romance", "red"),
        Err(GenreServiceError::InvalidColor(_))
    ));

    service.create_genre("Romance", "FF0000").unwrap();
    assert!(matches!(
        service.create_genre("ROMANCE", "00FF00"),
        Err(GenreServiceError::DuplicateName(_))
    ));
}

#[test]
fn genre_names_are_unique_across_accented_case() {
    let conn = open_db_in_memory().unwrap();
    let service = GenreService::new(SqliteGenreRepository::new(&conn));

    service.create_genre("Émile", "112233").unwrap();
    assert!(matches!(
        service.create_genre("émile", "445566"),
        Err(GenreServiceError::DuplicateName(_))
    ));

    // Bypasses the service lookup; the index still rejects it.
    let repo = SqliteGenreRepository::new(&conn);
    let twin = Genre::new("éMILE", GenreColor::from_rgb(0x77, 0x88, 0x99));
    assert!(matches!(
        repo.create_genre(&twin),
        Err(RepoError::DuplicateGenreName(_))
    ));
    assert_eq!(repo.list_genres().unwrap().len(), 1);
}

#[test]
fn toggle_adds_then_removes_link() {
    let conn = open_db_in_memory().unwrap();
    let books = BookService::new(SqliteBookRepository::new(&conn));
    let genres = GenreService::new(SqliteGenreRepository::new(&conn));
    let book = books.create_book("Emma", "Jane Austen", 0).unwrap().book;
    let romance = genres.create_genre("Romance", "FF0000").unwrap();
    let fiction = genres.create_genre("Fiction", "00FF00").unwrap();

    genres.toggle_book_genre(book.id, romance.id).unwrap();
    let linked = genres.toggle_book_genre(book.id, fiction.id).unwrap();
    let names: Vec<&str> = linked.iter().map(|genre| genre.name.as_str()).collect();
    assert_eq!(names, vec!["Fiction", "Romance"]);

    let linked = genres.toggle_book_genre(book.id, romance.id).unwrap();
    assert_eq!(linked, vec![fiction.clone()]);

    let record = books.get_book(book.id).unwrap().unwrap();
    assert_eq!(record.genres, vec![fiction]);
}

#[test]
fn deleting_genre_unlinks_but_keeps_books() {
    let conn = open_db_in_memory().unwrap();
    let books = BookService::new(SqliteBookRepository::new(&conn));
    let genres = GenreService::new(SqliteGenreRepository::new(&conn));
    let book = books.create_book("Emma", "Jane Austen", 0).unwrap().book;
    let romance = genres.create_genre("Romance", "FF0000").unwrap();
    genres.set_book_genres(book.id, &[romance.id]).unwrap();

    genres.delete_genre(romance.id).unwrap();

    let record = books.get_book(book.id).unwrap().unwrap();
    assert!(record.genres.is_empty());
    assert!(genres.list_genres().unwrap().is_empty());
}

#[test]
fn deleting_book_removes_links_but_keeps_genres() {
    let conn = open_db_in_memory().unwrap();
    let books = BookService::new(SqliteBookRepository::new(&conn));
    let genres = GenreService::new(SqliteGenreRepository::new(&conn));
    let book = books.create_book("Emma", "Jane Austen", 0).unwrap().book;
    let romance = genres.create_genre("Romance", "FF0000").unwrap();
    genres.set_book_genres(book.id, &[romance.id]).unwrap();

    books.delete_book(book.id).unwrap();

    assert_eq!(genres.list_genres().unwrap(), vec![romance]);
    let links: i64 = conn
        .query_row("SELECT COUNT(*) FROM book_genres;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(links, 0);
}

#[test]
fn set_book_genres_replaces_whole_set_and_rolls_back_on_unknown_genre() {
    let conn = open_db_in_memory().unwrap();
    let books = BookService::new(SqliteBookRepository::new(&conn));
    let genres = GenreService::new(SqliteGenreRepository::new(&conn));
    let book = books.create_book("Emma", "Jane Austen", 0).unwrap().book;
    let romance = genres.create_genre("Romance", "FF0000").unwrap();
    let fiction = genres.create_genre("Fiction", "00FF00").unwrap();

    genres
        .set_book_genres(book.id, &[romance.id, fiction.id, romance.id])
        .unwrap();
    let replaced = genres.set_book_genres(book.id, &[fiction.id]).unwrap();
    assert_eq!(replaced, vec![fiction.clone()]);

    let missing = Uuid::new_v4();
    let err = genres
        .set_book_genres(book.id, &[romance.id, missing])
        .unwrap_err();
    assert!(matches!(err, GenreServiceError::GenreNotFound(id) if id == missing));
    assert_eq!(genres.genres_for_book(book.id).unwrap(), vec![fiction]);
}

#[test]
fn toggle_on_missing_book_is_book_not_found() {
    let conn = open_db_in_memory().unwrap();
    let genres = GenreService::new(SqliteGenreRepository::new(&conn));
    let romance = genres.create_genre("Romance", "FF0000").unwrap();

    let missing = Uuid::new_v4();
    let err = genres.toggle_book_genre(missing, romance.id).unwrap_err();
    assert!(matches!(err, GenreServiceError::BookNotFound(id) if id == missing));
}

use crate::model::BookDraft;
use once_cell::sync::Lazy;

static SAMPLE_BOOKS: Lazy<Vec<BookDraft>> = Lazy::new(|| {
    vec![
        BookDraft::new(
            "Cien años de soledad",
            "Gabriel García Márquez",
            "978-0307350438",
        )
        .with_genre("Realismo mágico"),
        BookDraft::new("1984", "George Orwell", "978-0451524935").with_genre("Ciencia ficción"),
        BookDraft::new(
            "Don Quijote de la Mancha",
            "Miguel de Cervantes",
            "978-8424116361",
        )
        .with_genre("Novela"),
    ]
});

/// Example books for a first run. All start out available.
pub fn sample_books() -> Vec<BookDraft> {
    SAMPLE_BOOKS.clone()
}

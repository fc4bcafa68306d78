use destructure::Destructure;
use vodca::References;

use crate::entity::{AuthorName, Book, CategoryName, EditorialName};

/// Catalog row: a book joined with the names of its author, editorial and categories.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookSummary {
    book: Book,
    author_name: Option<AuthorName>,
    editorial_name: Option<EditorialName>,
    categories: Vec<CategoryName>,
}

impl BookSummary {
    pub fn new(
        book: Book,
        author_name: Option<AuthorName>,
        editorial_name: Option<EditorialName>,
        categories: Vec<CategoryName>,
    ) -> Self {
        Self {
            book,
            author_name,
            editorial_name,
            categories,
        }
    }
}

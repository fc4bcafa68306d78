use rust_decimal::Decimal;
use uuid::Uuid;

use kernel::prelude::entity::{
    Book, BookSummary, DestructBook, DestructBookSummary, SelectLimit, SelectOffset,
};

#[derive(Debug, Clone)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub editorial_id: Uuid,
    pub synopsis: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub effective_price: Decimal,
    pub stock: i32,
    pub featured: bool,
    pub rating: Decimal,
    pub active: bool,
    pub author_name: Option<String>,
    pub editorial_name: Option<String>,
    pub categories: Vec<String>,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let effective_price = value.effective_price().into();
        let DestructBook {
            id,
            title,
            slug,
            author_id,
            editorial_id,
            synopsis,
            price,
            discount_price,
            stock,
            featured,
            rating,
            active,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            author_id: author_id.into(),
            editorial_id: editorial_id.into(),
            synopsis: synopsis.map(Into::into),
            price: price.into(),
            discount_price: discount_price.map(Into::into),
            effective_price,
            stock: stock.into(),
            featured: featured.into(),
            rating: rating.into(),
            active: active.into(),
            author_name: None,
            editorial_name: None,
            categories: Vec::new(),
        }
    }
}

impl From<BookSummary> for BookDto {
    fn from(value: BookSummary) -> Self {
        let DestructBookSummary {
            book,
            author_name,
            editorial_name,
            categories,
        } = value.into_destruct();
        Self {
            author_name: author_name.map(Into::into),
            editorial_name: editorial_name.map(Into::into),
            categories: categories.into_iter().map(Into::into).collect(),
            ..Self::from(book)
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookPageDto {
    pub books: Vec<BookDto>,
    pub total: i64,
    pub page: i32,
    pub limit: i32,
    pub total_pages: i64,
}

#[derive(Debug, Clone)]
pub struct AvailabilityDto {
    pub book_id: Uuid,
    pub stock: i32,
    pub price: Decimal,
    pub available: bool,
}

#[derive(Debug, Default)]
pub struct ListBooksDto {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub editorial_id: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: bool,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

impl ListBooksDto {
    pub fn page(&self) -> i32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> SelectLimit {
        self.limit.map(SelectLimit::new).unwrap_or_default()
    }

    pub fn offset(&self) -> SelectOffset {
        SelectOffset::from_page(self.page(), &self.limit())
    }
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct GetBookBySlugDto {
    pub slug: String,
}

pub struct SearchBooksDto {
    pub query: String,
    pub limit: Option<i32>,
}

pub struct FeaturedBooksDto {
    pub limit: Option<i32>,
}

pub struct CreateBookDto {
    pub title: String,
    pub slug: Option<String>,
    pub author_id: Uuid,
    pub editorial_id: Uuid,
    pub synopsis: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock: i32,
    pub featured: bool,
    pub category_ids: Vec<Uuid>,
}

#[derive(Default)]
pub struct UpdateBookDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub author_id: Option<Uuid>,
    pub editorial_id: Option<Uuid>,
    pub synopsis: Option<String>,
    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    pub stock: Option<i32>,
    pub featured: Option<bool>,
}

pub struct DeleteBookDto {
    pub id: Uuid,
}

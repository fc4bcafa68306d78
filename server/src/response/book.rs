use crate::controller::Exhaust;
use crate::response::Reply;
use application::transfer::{AvailabilityDto, BookDto, BookPageDto};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreatedBookResponse {
    id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: Uuid,
    title: String,
    slug: String,
    author_id: Uuid,
    author_name: Option<String>,
    editorial_id: Uuid,
    editorial_name: Option<String>,
    categories: Vec<String>,
    synopsis: Option<String>,
    price: Decimal,
    discount_price: Option<Decimal>,
    effective_price: Decimal,
    stock: i32,
    featured: bool,
    rating: Decimal,
    active: bool,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            slug: value.slug,
            author_id: value.author_id,
            author_name: value.author_name,
            editorial_id: value.editorial_id,
            editorial_name: value.editorial_name,
            categories: value.categories,
            synopsis: value.synopsis,
            price: value.price,
            discount_price: value.discount_price,
            effective_price: value.effective_price,
            stock: value.stock,
            featured: value.featured,
            rating: value.rating,
            active: value.active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationResponse {
    page: i32,
    limit: i32,
    total: i64,
    total_pages: i64,
    has_next_page: bool,
    has_prev_page: bool,
}

#[derive(Debug, Serialize)]
pub struct BookPageResponse {
    books: Vec<BookResponse>,
    pagination: PaginationResponse,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    book_id: Uuid,
    stock: i32,
    price: Decimal,
    available: bool,
}

pub struct BookPresenter;

impl Exhaust<Uuid> for BookPresenter {
    type To = Reply<CreatedBookResponse>;
    fn emit(&self, input: Uuid) -> Self::To {
        Reply::created("Book created", CreatedBookResponse { id: input })
    }
}

impl Exhaust<()> for BookPresenter {
    type To = Reply<()>;
    fn emit(&self, _: ()) -> Self::To {
        Reply::message("Book deactivated")
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = Reply<BookResponse>;
    fn emit(&self, input: BookDto) -> Self::To {
        Reply::ok(BookResponse::from(input))
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Reply<BookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        Reply::found(input.map(BookResponse::from), "Book not found")
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = Reply<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        Reply::ok(input.into_iter().map(BookResponse::from).collect())
    }
}

impl Exhaust<BookPageDto> for BookPresenter {
    type To = Reply<BookPageResponse>;
    fn emit(&self, input: BookPageDto) -> Self::To {
        let pagination = PaginationResponse {
            page: input.page,
            limit: input.limit,
            total: input.total,
            total_pages: input.total_pages,
            has_next_page: i64::from(input.page) < input.total_pages,
            has_prev_page: input.page > 1,
        };
        Reply::ok(BookPageResponse {
            books: input.books.into_iter().map(BookResponse::from).collect(),
            pagination,
        })
    }
}

impl Exhaust<Option<AvailabilityDto>> for BookPresenter {
    type To = Reply<AvailabilityResponse>;
    fn emit(&self, input: Option<AvailabilityDto>) -> Self::To {
        let availability = input.map(|dto| AvailabilityResponse {
            book_id: dto.book_id,
            stock: dto.stock,
            price: dto.price,
            available: dto.available,
        });
        Reply::found(availability, "Book not found")
    }
}

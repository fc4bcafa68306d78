use crate::controller::Intake;
use application::transfer::{
    CreateBookDto, DeleteBookDto, FeaturedBooksDto, GetBookBySlugDto, GetBookDto, ListBooksDto,
    SearchBooksDto, UpdateBookDto,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

// Request bodies accept the storefront's Spanish field names as aliases.

#[derive(Debug, Deserialize)]
pub struct ListBooksRequest {
    page: Option<i32>,
    limit: Option<i32>,
    #[serde(alias = "q")]
    search: Option<String>,
    category_id: Option<Uuid>,
    author_id: Option<Uuid>,
    editorial_id: Option<Uuid>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    #[serde(default)]
    featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchBooksRequest {
    #[serde(default)]
    q: String,
    limit: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedBooksRequest {
    limit: Option<i32>,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: Uuid,
}

impl GetBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetBookBySlugRequest {
    slug: String,
}

impl GetBookBySlugRequest {
    pub fn new(slug: String) -> Self {
        Self { slug }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    #[serde(alias = "titulo")]
    title: String,
    slug: Option<String>,
    #[serde(alias = "id_autor")]
    author_id: Uuid,
    #[serde(alias = "id_editorial")]
    editorial_id: Uuid,
    #[serde(alias = "sinopsis")]
    synopsis: Option<String>,
    #[serde(alias = "precio")]
    price: Decimal,
    #[serde(alias = "precio_descuento")]
    discount_price: Option<Decimal>,
    #[serde(default)]
    stock: i32,
    #[serde(default, alias = "destacado")]
    featured: bool,
    #[serde(default, alias = "categorias")]
    category_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    #[serde(alias = "titulo")]
    title: Option<String>,
    slug: Option<String>,
    #[serde(alias = "id_autor")]
    author_id: Option<Uuid>,
    #[serde(alias = "id_editorial")]
    editorial_id: Option<Uuid>,
    #[serde(alias = "sinopsis")]
    synopsis: Option<String>,
    #[serde(alias = "precio")]
    price: Option<Decimal>,
    #[serde(alias = "precio_descuento")]
    discount_price: Option<Decimal>,
    stock: Option<i32>,
    #[serde(alias = "destacado")]
    featured: Option<bool>,
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: Uuid,
}

impl DeleteBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

impl Intake<ListBooksRequest> for BookTransformer {
    type To = ListBooksDto;
    fn emit(&self, input: ListBooksRequest) -> Self::To {
        ListBooksDto {
            search: input.search,
            category_id: input.category_id,
            author_id: input.author_id,
            editorial_id: input.editorial_id,
            min_price: input.min_price,
            max_price: input.max_price,
            featured: input.featured,
            page: input.page,
            limit: input.limit,
        }
    }
}

impl Intake<SearchBooksRequest> for BookTransformer {
    type To = SearchBooksDto;
    fn emit(&self, input: SearchBooksRequest) -> Self::To {
        SearchBooksDto {
            query: input.q,
            limit: input.limit,
        }
    }
}

impl Intake<FeaturedBooksRequest> for BookTransformer {
    type To = FeaturedBooksDto;
    fn emit(&self, input: FeaturedBooksRequest) -> Self::To {
        FeaturedBooksDto { limit: input.limit }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<GetBookBySlugRequest> for BookTransformer {
    type To = GetBookBySlugDto;
    fn emit(&self, input: GetBookBySlugRequest) -> Self::To {
        GetBookBySlugDto { slug: input.slug }
    }
}

impl Intake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateBookRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            slug: input.slug,
            author_id: input.author_id,
            editorial_id: input.editorial_id,
            synopsis: input.synopsis,
            price: input.price,
            discount_price: input.discount_price,
            stock: input.stock,
            featured: input.featured,
            category_ids: input.category_ids,
        }
    }
}

impl Intake<(Uuid, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (Uuid, UpdateBookRequest)) -> Self::To {
        let (id, input) = input;
        UpdateBookDto {
            id,
            title: input.title,
            slug: input.slug,
            author_id: input.author_id,
            editorial_id: input.editorial_id,
            synopsis: input.synopsis,
            price: input.price,
            discount_price: input.discount_price,
            stock: input.stock,
            featured: input.featured,
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

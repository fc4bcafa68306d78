use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    AuthorId, Book, BookFeatured, BookFilter, BookId, BookRating, BookSlug, BookStock,
    BookSynopsis, BookTitle, CategoryId, EditorialId, IsActive, Money, SelectLimit,
};
use kernel::KernelError;

use crate::transfer::{
    AvailabilityDto, BookDto, BookPageDto, CreateBookDto, DeleteBookDto, FeaturedBooksDto,
    GetBookBySlugDto, GetBookDto, ListBooksDto, SearchBooksDto, UpdateBookDto,
};

const FEATURED_LIMIT: i32 = 10;
const SEARCH_LIMIT: i32 = 20;

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let book = self
            .book_query()
            .find_summary_by_id(&mut connection, &id)
            .await?;

        Ok(book
            .filter(|summary| summary.book().is_purchasable())
            .map(BookDto::from))
    }

    async fn get_book_by_slug(
        &self,
        dto: GetBookBySlugDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let slug = BookSlug::new(dto.slug);
        let book = self.book_query().find_by_slug(&mut connection, &slug).await?;

        Ok(book
            .filter(|summary| summary.book().is_purchasable())
            .map(BookDto::from))
    }

    /// Current stock and effective price of an active book.
    async fn get_availability(
        &self,
        dto: GetBookDto,
    ) -> error_stack::Result<Option<AvailabilityDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let book = self.book_query().find_by_id(&mut connection, &id).await?;

        Ok(book.filter(Book::is_purchasable).map(|book| {
            let stock = *book.stock().as_ref();
            AvailabilityDto {
                book_id: dto.id,
                stock,
                price: book.effective_price().into(),
                available: stock > 0,
            }
        }))
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait ListBooksService: 'static + Sync + Send + DependOnBookQuery {
    async fn list_books(&self, dto: ListBooksDto) -> error_stack::Result<BookPageDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let page = dto.page();
        let limit = dto.limit();
        let filter = BookFilter {
            search: dto.search.clone(),
            category_id: dto.category_id.map(CategoryId::new),
            author_id: dto.author_id.map(AuthorId::new),
            editorial_id: dto.editorial_id.map(EditorialId::new),
            min_price: dto.min_price.map(Money::new),
            max_price: dto.max_price.map(Money::new),
            featured: dto.featured,
            limit,
            offset: dto.offset(),
        };

        let books = self.book_query().find_all(&mut connection, &filter).await?;
        let total = self.book_query().count(&mut connection, &filter).await?;
        let limit = *limit.as_ref();

        Ok(BookPageDto {
            books: books.into_iter().map(BookDto::from).collect(),
            total,
            page,
            limit,
            total_pages: (total + i64::from(limit) - 1) / i64::from(limit),
        })
    }

    async fn search_books(
        &self,
        dto: SearchBooksDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let query = dto.query.trim();
        if query.is_empty() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("search query must not be empty"));
        }

        let mut connection = self.database_connection().transact().await?;

        let filter = BookFilter {
            search: Some(query.to_string()),
            limit: SelectLimit::new(dto.limit.unwrap_or(SEARCH_LIMIT)),
            ..Default::default()
        };
        let books = self.book_query().find_all(&mut connection, &filter).await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }

    /// Featured books, best rated first.
    async fn featured_books(
        &self,
        dto: FeaturedBooksDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let filter = BookFilter {
            featured: true,
            limit: SelectLimit::new(dto.limit.unwrap_or(FEATURED_LIMIT)),
            ..Default::default()
        };
        let books = self.book_query().find_all(&mut connection, &filter).await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> ListBooksService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<Uuid, KernelError> {
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("title must not be blank"));
        }
        let slug = match dto.slug {
            Some(slug) => BookSlug::new(slug.trim()),
            None => BookSlug::from_title(&title),
        };

        let uuid = Uuid::new_v4();
        let book = Book::new(
            BookId::new(uuid),
            BookTitle::new(title),
            slug,
            AuthorId::new(dto.author_id),
            EditorialId::new(dto.editorial_id),
            dto.synopsis.map(BookSynopsis::new),
            Money::new(dto.price),
            dto.discount_price.map(Money::new),
            BookStock::new(dto.stock),
            BookFeatured::new(dto.featured),
            BookRating::default(),
            IsActive::new(true),
        );
        validate(&book)?;

        let mut connection = self.database_connection().transact().await?;

        ensure_slug_free(self.book_query(), &mut connection, &book).await?;
        let categories = dto
            .category_ids
            .into_iter()
            .map(CategoryId::new)
            .collect::<Vec<_>>();
        self.book_modifier()
            .create(&mut connection, &book, &categories)
            .await?;

        connection.commit().await?;
        tracing::info!(book_id = %uuid, slug = %book.slug(), "book created");

        Ok(uuid)
    }
}

impl<T> CreateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        // The row stays locked until commit; stock reservations wait for this write.
        let id = BookId::new(dto.id);
        let book = self
            .book_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("book {} not found", dto.id))
            })?;

        let mut book = book.into_destruct();
        if let Some(title) = dto.title {
            book.title = BookTitle::new(title.trim());
        }
        if let Some(slug) = dto.slug {
            book.slug = BookSlug::new(slug.trim());
        }
        if let Some(author_id) = dto.author_id {
            book.author_id = AuthorId::new(author_id);
        }
        if let Some(editorial_id) = dto.editorial_id {
            book.editorial_id = EditorialId::new(editorial_id);
        }
        if let Some(synopsis) = dto.synopsis {
            book.synopsis = Some(BookSynopsis::new(synopsis));
        }
        if let Some(price) = dto.price {
            book.price = Money::new(price);
        }
        if let Some(discount_price) = dto.discount_price {
            book.discount_price = Some(Money::new(discount_price));
        }
        if let Some(stock) = dto.stock {
            book.stock = BookStock::new(stock);
        }
        if let Some(featured) = dto.featured {
            book.featured = BookFeatured::new(featured);
        }
        let book = book.freeze();
        validate(&book)?;

        ensure_slug_free(self.book_query(), &mut connection, &book).await?;
        self.book_modifier().update(&mut connection, &book).await?;

        connection.commit().await?;
        tracing::info!(book_id = %dto.id, "book updated");

        Ok(BookDto::from(book))
    }
}

impl<T> UpdateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService: 'static + Sync + Send + DependOnBookModifier {
    /// Books are never removed; they are deactivated and drop out of the catalog.
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        if !self.book_modifier().deactivate(&mut connection, &id).await? {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("book {} not found", dto.id)));
        }

        connection.commit().await?;
        tracing::info!(book_id = %dto.id, "book deactivated");

        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookModifier {}

fn validate(book: &Book) -> error_stack::Result<(), KernelError> {
    let title: &String = book.title().as_ref();
    if title.is_empty() {
        return Err(Report::new(KernelError::Validation).attach_printable("title must not be blank"));
    }
    if !book.slug().is_valid() {
        return Err(Report::new(KernelError::Validation)
            .attach_printable("slug must be lowercase words joined by dashes"));
    }
    if !book.price().is_positive() {
        return Err(Report::new(KernelError::Validation)
            .attach_printable("price must be greater than zero"));
    }
    if book.discount_price().is_some_and(|discount| discount.is_negative()) {
        return Err(Report::new(KernelError::Validation)
            .attach_printable("discount price must not be negative"));
    }
    if *book.stock().as_ref() < 0 {
        return Err(Report::new(KernelError::Validation)
            .attach_printable("stock must not be negative"));
    }
    Ok(())
}

async fn ensure_slug_free<Q: BookQuery>(
    query: &Q,
    connection: &mut Q::Transaction,
    book: &Book,
) -> error_stack::Result<(), KernelError> {
    let taken = query
        .find_by_slug(connection, book.slug())
        .await?
        .is_some_and(|other| other.book().id() != book.id());
    if taken {
        return Err(Report::new(KernelError::Validation).attach_printable(format!(
            "slug {} is already in use",
            book.slug()
        )));
    }
    Ok(())
}

use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    AuthorId, AuthorName, Book, BookFeatured, BookFilter, BookId, BookRating, BookSlug,
    BookStock, BookSummary, BookSynopsis, BookTitle, CategoryId, CategoryName, EditorialId,
    EditorialName, IsActive, Money, Quantity,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id, true).await
    }

    async fn find_summary_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<BookSummary>, KernelError> {
        PgBookInternal::find_summary_by_id(con, id).await
    }

    async fn find_by_slug(
        &self,
        con: &mut PostgresTransaction,
        slug: &BookSlug,
    ) -> error_stack::Result<Option<BookSummary>, KernelError> {
        PgBookInternal::find_by_slug(con, slug).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        filter: &BookFilter,
    ) -> error_stack::Result<Vec<BookSummary>, KernelError> {
        PgBookInternal::find_all(con, filter).await
    }

    async fn count(
        &self,
        con: &mut PostgresTransaction,
        filter: &BookFilter,
    ) -> error_stack::Result<i64, KernelError> {
        PgBookInternal::count(con, filter).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
        categories: &[CategoryId],
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book, categories).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn deactivate(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::deactivate(con, book_id).await
    }

    async fn reserve_stock(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::reserve_stock(con, book_id, quantity).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    slug: String,
    author_id: Uuid,
    editorial_id: Uuid,
    synopsis: Option<String>,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: i32,
    featured: bool,
    rating: Decimal,
    active: bool,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book::new(
            BookId::new(row.id),
            BookTitle::new(row.title),
            BookSlug::new(row.slug),
            AuthorId::new(row.author_id),
            EditorialId::new(row.editorial_id),
            row.synopsis.map(BookSynopsis::new),
            Money::new(row.price),
            row.discount_price.map(Money::new),
            BookStock::new(row.stock),
            BookFeatured::new(row.featured),
            BookRating::new(row.rating),
            IsActive::new(row.active),
        )
    }
}

#[derive(sqlx::FromRow)]
struct BookSummaryRow {
    #[sqlx(flatten)]
    book: BookRow,
    author_name: Option<String>,
    editorial_name: Option<String>,
    categories: Vec<String>,
}

impl From<BookSummaryRow> for BookSummary {
    fn from(row: BookSummaryRow) -> Self {
        BookSummary::new(
            Book::from(row.book),
            row.author_name.map(AuthorName::new),
            row.editorial_name.map(EditorialName::new),
            row.categories.into_iter().map(CategoryName::new).collect(),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
        lock: bool,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let query = if lock {
            // language=postgresql
            r#"
            SELECT id, title, slug, author_id, editorial_id, synopsis, price, discount_price,
                   stock, featured, rating, active
            FROM books
            WHERE id = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT id, title, slug, author_id, editorial_id, synopsis, price, discount_price,
                   stock, featured, rating, active
            FROM books
            WHERE id = $1
            "#
        };
        let row = sqlx::query_as::<_, BookRow>(query)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_summary_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<BookSummary>, KernelError> {
        let row = sqlx::query_as::<_, BookSummaryRow>(
            // language=postgresql
            r#"
            SELECT b.id, b.title, b.slug, b.author_id, b.editorial_id, b.synopsis, b.price,
                   b.discount_price, b.stock, b.featured, b.rating, b.active,
                   a.name AS author_name,
                   e.name AS editorial_name,
                   COALESCE(ARRAY_AGG(c.name ORDER BY c.name) FILTER (WHERE c.id IS NOT NULL), '{}')::TEXT[] AS categories
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            LEFT JOIN editorials e ON e.id = b.editorial_id
            LEFT JOIN book_categories bc ON bc.book_id = b.id
            LEFT JOIN categories c ON c.id = bc.category_id
            WHERE b.id = $1
            GROUP BY b.id, a.name, e.name
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(BookSummary::from))
    }

    async fn find_by_slug(
        con: &mut PgConnection,
        slug: &BookSlug,
    ) -> error_stack::Result<Option<BookSummary>, KernelError> {
        let row = sqlx::query_as::<_, BookSummaryRow>(
            // language=postgresql
            r#"
            SELECT b.id, b.title, b.slug, b.author_id, b.editorial_id, b.synopsis, b.price,
                   b.discount_price, b.stock, b.featured, b.rating, b.active,
                   a.name AS author_name,
                   e.name AS editorial_name,
                   COALESCE(ARRAY_AGG(c.name ORDER BY c.name) FILTER (WHERE c.id IS NOT NULL), '{}')::TEXT[] AS categories
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            LEFT JOIN editorials e ON e.id = b.editorial_id
            LEFT JOIN book_categories bc ON bc.book_id = b.id
            LEFT JOIN categories c ON c.id = bc.category_id
            WHERE b.slug = $1
            GROUP BY b.id, a.name, e.name
            "#,
        )
        .bind(slug.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(BookSummary::from))
    }

    async fn find_all(
        con: &mut PgConnection,
        filter: &BookFilter,
    ) -> error_stack::Result<Vec<BookSummary>, KernelError> {
        let rows = sqlx::query_as::<_, BookSummaryRow>(
            // language=postgresql
            r#"
            SELECT b.id, b.title, b.slug, b.author_id, b.editorial_id, b.synopsis, b.price,
                   b.discount_price, b.stock, b.featured, b.rating, b.active,
                   a.name AS author_name,
                   e.name AS editorial_name,
                   COALESCE(ARRAY_AGG(c.name ORDER BY c.name) FILTER (WHERE c.id IS NOT NULL), '{}')::TEXT[] AS categories
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            LEFT JOIN editorials e ON e.id = b.editorial_id
            LEFT JOIN book_categories bc ON bc.book_id = b.id
            LEFT JOIN categories c ON c.id = bc.category_id
            WHERE b.active
              AND ($1::TEXT IS NULL OR b.title ILIKE $1 OR b.synopsis ILIKE $1 OR a.name ILIKE $1)
              AND ($2::UUID IS NULL OR EXISTS (
                  SELECT 1 FROM book_categories f WHERE f.book_id = b.id AND f.category_id = $2
              ))
              AND ($3::UUID IS NULL OR b.author_id = $3)
              AND ($4::UUID IS NULL OR b.editorial_id = $4)
              AND ($5::NUMERIC IS NULL OR LEAST(b.discount_price, b.price) >= $5)
              AND ($6::NUMERIC IS NULL OR LEAST(b.discount_price, b.price) <= $6)
              AND (NOT $7 OR b.featured)
            GROUP BY b.id, a.name, e.name
            ORDER BY CASE WHEN $7 THEN b.rating END DESC NULLS LAST, b.created_at DESC, b.id
            LIMIT $8 OFFSET $9
            "#,
        )
        .bind(filter.search_pattern())
        .bind(filter.category_id.as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(filter.author_id.as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(filter.editorial_id.as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(filter.min_price.map(Decimal::from))
        .bind(filter.max_price.map(Decimal::from))
        .bind(filter.featured)
        .bind(i64::from(*filter.limit.as_ref()))
        .bind(i64::from(*filter.offset.as_ref()))
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(BookSummary::from).collect())
    }

    async fn count(
        con: &mut PgConnection,
        filter: &BookFilter,
    ) -> error_stack::Result<i64, KernelError> {
        let (count,) = sqlx::query_as::<_, (i64,)>(
            // language=postgresql
            r#"
            SELECT COUNT(*)
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            WHERE b.active
              AND ($1::TEXT IS NULL OR b.title ILIKE $1 OR b.synopsis ILIKE $1 OR a.name ILIKE $1)
              AND ($2::UUID IS NULL OR EXISTS (
                  SELECT 1 FROM book_categories f WHERE f.book_id = b.id AND f.category_id = $2
              ))
              AND ($3::UUID IS NULL OR b.author_id = $3)
              AND ($4::UUID IS NULL OR b.editorial_id = $4)
              AND ($5::NUMERIC IS NULL OR LEAST(b.discount_price, b.price) >= $5)
              AND ($6::NUMERIC IS NULL OR LEAST(b.discount_price, b.price) <= $6)
              AND (NOT $7 OR b.featured)
            "#,
        )
        .bind(filter.search_pattern())
        .bind(filter.category_id.as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(filter.author_id.as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(filter.editorial_id.as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(filter.min_price.map(Decimal::from))
        .bind(filter.max_price.map(Decimal::from))
        .bind(filter.featured)
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(count)
    }

    async fn create(
        con: &mut PgConnection,
        book: &Book,
        categories: &[CategoryId],
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books (id, title, slug, author_id, editorial_id, synopsis, price,
                               discount_price, stock, featured, rating, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.slug().as_ref())
        .bind(book.author_id().as_ref())
        .bind(book.editorial_id().as_ref())
        .bind(book.synopsis().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.price().as_ref())
        .bind(book.discount_price().map(Decimal::from))
        .bind(book.stock().as_ref())
        .bind(book.featured().as_ref())
        .bind(book.rating().as_ref())
        .bind(book.active().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;

        if categories.is_empty() {
            return Ok(());
        }
        let categories = categories
            .iter()
            .map(|category| *category.as_ref())
            .collect::<Vec<Uuid>>();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO book_categories (book_id, category_id)
            SELECT $1, UNNEST($2::UUID[])
            "#,
        )
        .bind(book.id().as_ref())
        .bind(categories)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2, slug = $3, author_id = $4, editorial_id = $5, synopsis = $6,
                price = $7, discount_price = $8, stock = $9, featured = $10, active = $11,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.slug().as_ref())
        .bind(book.author_id().as_ref())
        .bind(book.editorial_id().as_ref())
        .bind(book.synopsis().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.price().as_ref())
        .bind(book.discount_price().map(Decimal::from))
        .bind(book.stock().as_ref())
        .bind(book.featured().as_ref())
        .bind(book.active().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn deactivate(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET active = FALSE, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() > 0)
    }

    async fn reserve_stock(
        con: &mut PgConnection,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND active AND stock >= $2
            "#,
        )
        .bind(book_id.as_ref())
        .bind(quantity.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
pub(in crate::database) mod test {
    use std::time::Duration;

    use rust_decimal_macros::dec;
    use sqlx::PgConnection;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        AuthorId, AuthorName, Book, BookFeatured, BookFilter, BookId, BookRating, BookSlug, BookStock,
        BookTitle, EditorialId, IsActive, Money, Quantity,
    };
    use kernel::KernelError;

    use crate::database::postgres::book::PostgresBookRepository;
    use crate::database::postgres::PostgresDatabase;
    use crate::error::ConvertError;

    /// Inserts an author and an editorial and returns a book referencing them.
    pub(in crate::database) async fn book_fixture(
        con: &mut PgConnection,
        stock: i32,
    ) -> error_stack::Result<Book, KernelError> {
        let author_id = Uuid::new_v4();
        let editorial_id = Uuid::new_v4();
        sqlx::query("INSERT INTO authors (id, name) VALUES ($1, 'Juan Rulfo')")
            .bind(author_id)
            .execute(&mut *con)
            .await
            .convert_error()?;
        sqlx::query("INSERT INTO editorials (id, name) VALUES ($1, 'Cátedra')")
            .bind(editorial_id)
            .execute(&mut *con)
            .await
            .convert_error()?;
        let id = Uuid::new_v4();
        Ok(Book::new(
            BookId::new(id),
            BookTitle::new("Pedro Páramo"),
            BookSlug::new(format!("pedro-paramo-{}", id.simple())),
            AuthorId::new(author_id),
            EditorialId::new(editorial_id),
            None,
            Money::new(dec!(25.00)),
            Some(Money::new(dec!(20.00))),
            BookStock::new(stock),
            BookFeatured::new(true),
            BookRating::default(),
            IsActive::new(true),
        ))
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_find_and_deactivate() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut connection = db.transact().await?;

        let book = book_fixture(&mut connection, 3).await?;
        PostgresBookRepository
            .create(&mut connection, &book, &[])
            .await?;

        let found = PostgresBookRepository
            .find_by_id(&mut connection, book.id())
            .await?;
        assert_eq!(found.as_ref(), Some(&book));

        let summary = PostgresBookRepository
            .find_by_slug(&mut connection, book.slug())
            .await?
            .unwrap();
        assert_eq!(summary.author_name(), &Some(AuthorName::new("Juan Rulfo")));

        let filter = BookFilter {
            search: Some("rulfo".to_string()),
            ..Default::default()
        };
        assert!(PostgresBookRepository.count(&mut connection, &filter).await? >= 1);

        assert!(
            PostgresBookRepository
                .deactivate(&mut connection, book.id())
                .await?
        );
        let found = PostgresBookRepository
            .find_summary_by_id(&mut connection, book.id())
            .await?
            .unwrap();
        assert!(!found.book().is_purchasable());

        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn reserve_stock_never_goes_negative() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut connection = db.transact().await?;

        let book = book_fixture(&mut connection, 3).await?;
        PostgresBookRepository
            .create(&mut connection, &book, &[])
            .await?;

        assert!(
            PostgresBookRepository
                .reserve_stock(&mut connection, book.id(), &Quantity::new(2))
                .await?
        );
        assert!(
            !PostgresBookRepository
                .reserve_stock(&mut connection, book.id(), &Quantity::new(2))
                .await?
        );
        let found = PostgresBookRepository
            .find_by_id(&mut connection, book.id())
            .await?
            .unwrap();
        assert_eq!(found.stock(), &BookStock::new(1));

        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn locked_edit_keeps_concurrent_reservation() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut setup = db.transact().await?;
        let book = book_fixture(&mut setup, 10).await?;
        PostgresBookRepository.create(&mut setup, &book, &[]).await?;
        setup.commit().await?;

        let mut editor = db.transact().await?;
        let locked = PostgresBookRepository
            .find_by_id_for_update(&mut editor, book.id())
            .await?
            .unwrap();

        let reservation = tokio::spawn({
            let db = db.clone();
            let id = book.id().clone();
            async move {
                let mut connection = db.transact().await?;
                let reserved = PostgresBookRepository
                    .reserve_stock(&mut connection, &id, &Quantity::new(2))
                    .await?;
                connection.commit().await?;
                Ok::<_, error_stack::Report<KernelError>>(reserved)
            }
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!reservation.is_finished());

        let mut edited = locked.into_destruct();
        edited.price = Money::new(dec!(30.00));
        PostgresBookRepository
            .update(&mut editor, &edited.freeze())
            .await?;
        editor.commit().await?;

        assert!(reservation.await.unwrap()?);
        let mut connection = db.transact().await?;
        let found = PostgresBookRepository
            .find_by_id(&mut connection, book.id())
            .await?
            .unwrap();
        assert_eq!(found.stock(), &BookStock::new(8));
        assert_eq!(found.price(), &Money::new(dec!(30.00)));

        Ok(())
    }
}

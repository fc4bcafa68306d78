use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookFilter, BookId, BookSlug, BookSummary};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Looks a book up regardless of its active flag.
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    /// Like [`BookQuery::find_by_id`], locking the row until the transaction
    /// ends so stock reservations wait for the caller's write.
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    /// Looks a book up regardless of its active flag.
    async fn find_summary_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<BookSummary>, KernelError>;
    /// Looks a book up regardless of its active flag.
    async fn find_by_slug(
        &self,
        con: &mut Self::Transaction,
        slug: &BookSlug,
    ) -> error_stack::Result<Option<BookSummary>, KernelError>;
    /// Active books matching `filter`.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        filter: &BookFilter,
    ) -> error_stack::Result<Vec<BookSummary>, KernelError>;
    /// Number of books matching `filter`, ignoring its limit and offset.
    async fn count(
        &self,
        con: &mut Self::Transaction,
        filter: &BookFilter,
    ) -> error_stack::Result<i64, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}

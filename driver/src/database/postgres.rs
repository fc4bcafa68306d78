use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::{Report, ResultExt};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnAuthQuery, DependOnBookQuery, DependOnCartQuery, DependOnOrderQuery,
};
use kernel::interface::update::{DependOnBookModifier, DependOnCartModifier, DependOnOrderModifier};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{auth::*, book::*, cart::*, order::*};

mod auth;
mod book;
mod cart;
#[cfg(test)]
mod concurrency;
mod order;

const POSTGRES_URL: &str = "POSTGRES_URL";
const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&url)
            .await
            .convert_error()?;
        Ok(Self { pool })
    }

    /// Applies pending migrations from `migrations/`.
    pub async fn migrate(&self) -> error_stack::Result<(), KernelError> {
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to run database migrations")
    }
}

/// A database transaction. Dropping it without [`Transaction::commit`] rolls it back.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(con))
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnCartQuery for PostgresDatabase {
    type CartQuery = PostgresCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &PostgresCartRepository
    }
}

impl DependOnCartModifier for PostgresDatabase {
    type CartModifier = PostgresCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &PostgresCartRepository
    }
}

impl DependOnOrderQuery for PostgresDatabase {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for PostgresDatabase {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl DependOnAuthQuery for PostgresDatabase {
    type AuthQuery = PostgresAuthRepository;
    fn auth_query(&self) -> &Self::AuthQuery {
        &PostgresAuthRepository
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            Error::PoolTimedOut => Report::from(error).change_context(KernelError::Timeout),
            Error::Database(ref database) if database.is_unique_violation() => {
                Report::from(error).change_context(KernelError::Concurrency)
            }
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}

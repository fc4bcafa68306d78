use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Cart, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// The user's cart with its items, oldest line first.
    async fn find_by_user(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Cart>, KernelError>;
    /// Same as [`CartQuery::find_by_user`], holding the cart row locked until
    /// the transaction ends. Writers to one cart queue behind each other.
    async fn find_by_user_for_update(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Cart>, KernelError>;
}

pub trait DependOnCartQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartQuery: CartQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_query(&self) -> &Self::CartQuery;
}

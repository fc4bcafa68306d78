use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Order, OrderId, OrderStatus};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Inserts the order and its items. Returns `false`, writing nothing, when
    /// the order number is already taken.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<bool, KernelError>;
    /// Sets `to` only while the stored status is still `from`.
    async fn update_status(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
        from: &OrderStatus,
        to: &OrderStatus,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnOrderModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderModifier: OrderModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_modifier(&self) -> &Self::OrderModifier;
}

use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{CartId, CartItem, CartItemId, Quantity, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Does nothing when the user already has a cart.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError>;
    async fn add_item(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError>;
    async fn update_quantity(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        item_id: &CartItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError>;
    async fn remove_item(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> error_stack::Result<(), KernelError>;
    /// Removes every item; returns how many were removed.
    async fn clear(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
    ) -> error_stack::Result<u64, KernelError>;
}

pub trait DependOnCartModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartModifier: CartModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_modifier(&self) -> &Self::CartModifier;
}

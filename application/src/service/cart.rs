use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, CartQuery, DependOnBookQuery, DependOnCartQuery};
use kernel::interface::update::{CartModifier, DependOnCartModifier};
use kernel::prelude::entity::{
    Book, BookId, CartId, CartItem, CartItemId, CreatedAt, Quantity, UserId,
};
use kernel::KernelError;

use crate::transfer::{
    AddCartItemDto, CartDto, ClearCartDto, GetCartDto, RemoveCartItemDto, UpdateCartItemDto,
};

#[async_trait::async_trait]
pub trait GetCartService: 'static + Sync + Send + DependOnCartQuery {
    /// Never creates a cart; a user without one sees an empty cart.
    async fn get_cart(&self, dto: GetCartDto) -> error_stack::Result<CartDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let cart = self
            .cart_query()
            .find_by_user(&mut connection, &user_id)
            .await?;

        Ok(cart.map(CartDto::from).unwrap_or_else(CartDto::empty))
    }
}

impl<T> GetCartService for T where T: DependOnCartQuery {}

#[async_trait::async_trait]
pub trait AddCartItemService:
    'static + Sync + Send + DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
    /// Adds `quantity` units of a book, merging with an existing line for the
    /// same book. New lines capture the book's effective price.
    async fn add_cart_item(&self, dto: AddCartItemDto) -> error_stack::Result<CartDto, KernelError> {
        let quantity = Quantity::new(dto.quantity);
        if !quantity.is_positive() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("quantity must be at least 1"));
        }

        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let book = self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?
            .filter(Book::is_purchasable)
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("book {} not found", dto.book_id))
            })?;

        let cart = match self
            .cart_query()
            .find_by_user_for_update(&mut connection, &user_id)
            .await?
        {
            Some(cart) => cart,
            None => {
                self.cart_modifier()
                    .create(&mut connection, &CartId::new(Uuid::new_v4()), &user_id)
                    .await?;
                // Another request may have created it first; lock whichever won.
                self.cart_query()
                    .find_by_user_for_update(&mut connection, &user_id)
                    .await?
                    .ok_or_else(|| {
                        Report::new(KernelError::Internal)
                            .attach_printable(format!("cart of user {} vanished", dto.user_id))
                    })?
            }
        };

        match cart.find_by_book(&book_id) {
            Some(existing) => {
                let merged = existing.quantity().checked_add(&quantity).ok_or_else(|| {
                    Report::new(KernelError::Validation).attach_printable("quantity is too large")
                })?;
                ensure_supply(&book, &merged)?;
                self.cart_modifier()
                    .update_quantity(&mut connection, cart.id(), existing.id(), &merged)
                    .await?;
            }
            None => {
                ensure_supply(&book, &quantity)?;
                let item = CartItem::new(
                    CartItemId::new(Uuid::new_v4()),
                    book_id.clone(),
                    book.title().clone(),
                    quantity,
                    book.effective_price(),
                    CreatedAt::now(),
                );
                self.cart_modifier()
                    .add_item(&mut connection, cart.id(), &item)
                    .await?;
            }
        }

        let cart = self
            .cart_query()
            .find_by_user(&mut connection, &user_id)
            .await?;
        connection.commit().await?;
        tracing::debug!(
            user_id = %dto.user_id,
            book_id = %dto.book_id,
            quantity = dto.quantity,
            "cart item added"
        );

        Ok(cart.map(CartDto::from).unwrap_or_else(CartDto::empty))
    }
}

impl<T> AddCartItemService for T where
    T: DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
}

#[async_trait::async_trait]
pub trait UpdateCartItemService:
    'static + Sync + Send + DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
    /// Sets a line's quantity. Zero removes the line.
    async fn update_cart_item(
        &self,
        dto: UpdateCartItemDto,
    ) -> error_stack::Result<CartDto, KernelError> {
        let quantity = Quantity::new(dto.quantity);
        if *quantity.as_ref() < 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("quantity must not be negative"));
        }

        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let item_id = CartItemId::new(dto.item_id);
        let not_found = || {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("cart item {} not found", dto.item_id))
        };
        let cart = self
            .cart_query()
            .find_by_user_for_update(&mut connection, &user_id)
            .await?
            .ok_or_else(not_found)?;
        let item = cart.find_item(&item_id).ok_or_else(not_found)?;

        if quantity.is_zero() {
            self.cart_modifier()
                .remove_item(&mut connection, cart.id(), &item_id)
                .await?;
        } else {
            let book = self
                .book_query()
                .find_by_id(&mut connection, item.book_id())
                .await?
                .filter(Book::is_purchasable)
                .ok_or_else(|| {
                    Report::new(KernelError::NotFound).attach_printable("book is no longer available")
                })?;
            ensure_supply(&book, &quantity)?;
            self.cart_modifier()
                .update_quantity(&mut connection, cart.id(), &item_id, &quantity)
                .await?;
        }

        let cart = self
            .cart_query()
            .find_by_user(&mut connection, &user_id)
            .await?;
        connection.commit().await?;

        Ok(cart.map(CartDto::from).unwrap_or_else(CartDto::empty))
    }
}

impl<T> UpdateCartItemService for T where
    T: DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
}

#[async_trait::async_trait]
pub trait RemoveCartItemService:
    'static + Sync + Send + DependOnCartQuery + DependOnCartModifier
{
    /// Removing a line that is not in the cart is not an error.
    async fn remove_cart_item(
        &self,
        dto: RemoveCartItemDto,
    ) -> error_stack::Result<CartDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let Some(cart) = self
            .cart_query()
            .find_by_user_for_update(&mut connection, &user_id)
            .await?
        else {
            return Ok(CartDto::empty());
        };

        let item_id = CartItemId::new(dto.item_id);
        self.cart_modifier()
            .remove_item(&mut connection, cart.id(), &item_id)
            .await?;

        let cart = self
            .cart_query()
            .find_by_user(&mut connection, &user_id)
            .await?;
        connection.commit().await?;

        Ok(cart.map(CartDto::from).unwrap_or_else(CartDto::empty))
    }
}

impl<T> RemoveCartItemService for T where T: DependOnCartQuery + DependOnCartModifier {}

#[async_trait::async_trait]
pub trait ClearCartService: 'static + Sync + Send + DependOnCartQuery + DependOnCartModifier {
    async fn clear_cart(&self, dto: ClearCartDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        if let Some(cart) = self
            .cart_query()
            .find_by_user_for_update(&mut connection, &user_id)
            .await?
        {
            let removed = self.cart_modifier().clear(&mut connection, cart.id()).await?;
            tracing::debug!(user_id = %dto.user_id, removed, "cart cleared");
        }

        connection.commit().await?;
        Ok(())
    }
}

impl<T> ClearCartService for T where T: DependOnCartQuery + DependOnCartModifier {}

fn ensure_supply(book: &Book, quantity: &Quantity) -> error_stack::Result<(), KernelError> {
    if book.can_supply(quantity) {
        return Ok(());
    }
    Err(Report::new(KernelError::InsufficientStock {
        title: book.title().clone().into(),
        available: *book.stock().as_ref(),
    }))
}

use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{Cart, CartItem, DestructCart, DestructCartItem};

#[derive(Debug, Clone)]
pub struct CartItemDto {
    pub id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub added_at: OffsetDateTime,
}

impl From<CartItem> for CartItemDto {
    fn from(value: CartItem) -> Self {
        let line_total = value.line_total().into();
        let DestructCartItem {
            id,
            book_id,
            title,
            quantity,
            unit_price,
            added_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            book_id: book_id.into(),
            title: title.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            line_total,
            added_at: added_at.into(),
        }
    }
}

/// Cart view. `id` is `None` until the first item is added.
#[derive(Debug, Clone)]
pub struct CartDto {
    pub id: Option<Uuid>,
    pub items: Vec<CartItemDto>,
    pub subtotal: Decimal,
    pub total_items: i64,
}

impl CartDto {
    pub fn empty() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            total_items: 0,
        }
    }
}

impl From<Cart> for CartDto {
    fn from(value: Cart) -> Self {
        let subtotal = value.subtotal().into();
        let total_items = value.total_items();
        let DestructCart { id, items, .. } = value.into_destruct();
        Self {
            id: Some(id.into()),
            items: items.into_iter().map(CartItemDto::from).collect(),
            subtotal,
            total_items,
        }
    }
}

pub struct GetCartDto {
    pub user_id: Uuid,
}

pub struct AddCartItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

pub struct UpdateCartItemDto {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
}

pub struct RemoveCartItemDto {
    pub user_id: Uuid,
    pub item_id: Uuid,
}

pub struct ClearCartDto {
    pub user_id: Uuid,
}

use destructure::Destructure;
use vodca::References;

use crate::entity::{BookId, BookTitle, CartItem, Money, Quantity};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct OrderItem {
    book_id: BookId,
    title: BookTitle,
    quantity: Quantity,
    unit_price: Money,
    subtotal: Money,
}

impl OrderItem {
    pub fn new(
        book_id: BookId,
        title: BookTitle,
        quantity: Quantity,
        unit_price: Money,
        subtotal: Money,
    ) -> Self {
        Self {
            book_id,
            title,
            quantity,
            unit_price,
            subtotal,
        }
    }

    pub fn from_cart_item(item: &CartItem) -> Self {
        Self {
            book_id: item.book_id().clone(),
            title: item.title().clone(),
            quantity: *item.quantity(),
            unit_price: *item.unit_price(),
            subtotal: item.line_total(),
        }
    }
}

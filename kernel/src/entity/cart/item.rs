use destructure::Destructure;
use vodca::References;

use crate::entity::{BookId, BookTitle, CartItemId, CreatedAt, Money, Quantity};

/// One cart line. `unit_price` is captured when the line is created and is not
/// re-read from the catalog afterwards; `title` is joined from the catalog on read.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct CartItem {
    id: CartItemId,
    book_id: BookId,
    title: BookTitle,
    quantity: Quantity,
    unit_price: Money,
    added_at: CreatedAt<CartItem>,
}

impl CartItem {
    pub fn new(
        id: CartItemId,
        book_id: BookId,
        title: BookTitle,
        quantity: Quantity,
        unit_price: Money,
        added_at: CreatedAt<CartItem>,
    ) -> Self {
        Self {
            id,
            book_id,
            title,
            quantity,
            unit_price,
            added_at,
        }
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(&self.quantity)
    }
}

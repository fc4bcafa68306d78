mod id;
mod item;

pub use self::{id::*, item::*};
use crate::entity::{BookId, Money, UserId};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Cart {
    id: CartId,
    user_id: UserId,
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new(id: CartId, user_id: UserId, items: Vec<CartItem>) -> Self {
        Self { id, user_id, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `Σ unit_price × quantity` over the captured unit prices.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of units across all lines. Summed in `i64`: each line fits in
    /// `i32` but their sum need not.
    pub fn total_items(&self) -> i64 {
        self.items
            .iter()
            .map(|item| i64::from(*item.quantity().as_ref()))
            .sum()
    }

    pub fn find_item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_by_book(&self, book_id: &BookId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.book_id() == book_id)
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::entity::{
        BookId, BookTitle, Cart, CartId, CartItem, CartItemId, CreatedAt, Money, Quantity,
        UserId,
    };

    fn item(quantity: i32, unit_price: Money) -> CartItem {
        CartItem::new(
            CartItemId::new(Uuid::new_v4()),
            BookId::new(Uuid::new_v4()),
            BookTitle::new("title"),
            Quantity::new(quantity),
            unit_price,
            CreatedAt::now(),
        )
    }

    #[test]
    fn subtotal_and_unit_count() {
        let a = item(2, Money::new(dec!(25.00)));
        let b = item(1, Money::new(dec!(60.00)));
        let book_a = a.book_id().clone();
        let item_b = b.id().clone();
        let cart = Cart::new(
            CartId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            vec![a, b],
        );
        assert_eq!(cart.subtotal(), Money::new(dec!(110.00)));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(
            cart.find_by_book(&book_a).map(CartItem::quantity),
            Some(&Quantity::new(2))
        );
        assert!(cart.find_by_book(&BookId::new(Uuid::new_v4())).is_none());
        assert!(cart.find_item(&item_b).is_some());
    }

    #[test]
    fn unit_count_does_not_overflow() {
        let cart = Cart::new(
            CartId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            vec![
                item(i32::MAX, Money::new(dec!(1.00))),
                item(i32::MAX, Money::new(dec!(1.00))),
                item(2, Money::new(dec!(1.00))),
            ],
        );
        assert_eq!(cart.total_items(), 2 * i64::from(i32::MAX) + 2);
    }

    #[test]
    fn empty_cart() {
        let cart = Cart::new(
            CartId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            vec![],
        );
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
        assert_eq!(cart.total_items(), 0);
    }
}

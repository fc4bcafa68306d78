use crate::controller::Exhaust;
use crate::response::Reply;
use application::transfer::{CartDto, CartItemDto};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    id: Uuid,
    book_id: Uuid,
    title: String,
    quantity: i32,
    unit_price: Decimal,
    line_total: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    added_at: OffsetDateTime,
}

impl From<CartItemDto> for CartItemResponse {
    fn from(value: CartItemDto) -> Self {
        Self {
            id: value.id,
            book_id: value.book_id,
            title: value.title,
            quantity: value.quantity,
            unit_price: value.unit_price,
            line_total: value.line_total,
            added_at: value.added_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    id: Option<Uuid>,
    items: Vec<CartItemResponse>,
    subtotal: Decimal,
    total_items: i64,
}

pub struct CartPresenter;

impl Exhaust<CartDto> for CartPresenter {
    type To = Reply<CartResponse>;
    fn emit(&self, input: CartDto) -> Self::To {
        Reply::ok(CartResponse {
            id: input.id,
            items: input.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal: input.subtotal,
            total_items: input.total_items,
        })
    }
}

impl Exhaust<()> for CartPresenter {
    type To = Reply<()>;
    fn emit(&self, _: ()) -> Self::To {
        Reply::message("Cart cleared")
    }
}

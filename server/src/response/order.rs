use crate::controller::Exhaust;
use crate::response::Reply;
use application::transfer::{OrderDto, OrderItemDto};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    book_id: Uuid,
    title: String,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl From<OrderItemDto> for OrderItemResponse {
    fn from(value: OrderItemDto) -> Self {
        Self {
            book_id: value.book_id,
            title: value.title,
            quantity: value.quantity,
            unit_price: value.unit_price,
            subtotal: value.subtotal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    id: Uuid,
    order_number: String,
    user_id: Uuid,
    status: String,
    subtotal: Decimal,
    tax: Decimal,
    shipping: Decimal,
    total: Decimal,
    address: String,
    city: String,
    postal_code: String,
    phone: String,
    payment_method: String,
    notes: Option<String>,
    total_items: i64,
    items: Vec<OrderItemResponse>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<OrderDto> for OrderResponse {
    fn from(value: OrderDto) -> Self {
        Self {
            id: value.id,
            order_number: value.order_number,
            user_id: value.user_id,
            status: value.status,
            subtotal: value.subtotal,
            tax: value.tax,
            shipping: value.shipping,
            total: value.total,
            address: value.address,
            city: value.city,
            postal_code: value.postal_code,
            phone: value.phone,
            payment_method: value.payment_method,
            notes: value.notes,
            total_items: value.items.iter().map(|item| i64::from(item.quantity)).sum(),
            items: value.items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: value.created_at,
        }
    }
}

pub struct OrderPresenter;

impl Exhaust<OrderDto> for OrderPresenter {
    type To = Reply<OrderResponse>;
    fn emit(&self, input: OrderDto) -> Self::To {
        Reply::ok(OrderResponse::from(input))
    }
}

impl Exhaust<Vec<OrderDto>> for OrderPresenter {
    type To = Reply<Vec<OrderResponse>>;
    fn emit(&self, input: Vec<OrderDto>) -> Self::To {
        Reply::ok(input.into_iter().map(OrderResponse::from).collect())
    }
}

/// Newly placed orders answer `201 Created`.
pub struct CheckoutPresenter;

impl Exhaust<OrderDto> for CheckoutPresenter {
    type To = Reply<OrderResponse>;
    fn emit(&self, input: OrderDto) -> Self::To {
        Reply::created("Order placed", OrderResponse::from(input))
    }
}

use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{
    Caller, DestructCaller, DestructOrder, DestructOrderItem, DestructOrderTotals,
    DestructShippingAddress, Order, OrderItem, SelectLimit, SelectOffset, UserRole,
};

#[derive(Debug, Clone)]
pub struct OrderItemDto {
    pub book_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(value: OrderItem) -> Self {
        let DestructOrderItem {
            book_id,
            title,
            quantity,
            unit_price,
            subtotal,
        } = value.into_destruct();
        Self {
            book_id: book_id.into(),
            title: title.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            subtotal: subtotal.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderDto {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub status: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItemDto>,
    pub created_at: OffsetDateTime,
}

impl From<Order> for OrderDto {
    fn from(value: Order) -> Self {
        let DestructOrder {
            id,
            number,
            user_id,
            status,
            totals,
            shipping_address,
            payment_method,
            notes,
            items,
            created_at,
        } = value.into_destruct();
        let DestructOrderTotals {
            subtotal,
            tax,
            shipping,
            total,
        } = totals.into_destruct();
        let DestructShippingAddress {
            address,
            city,
            postal_code,
            phone,
        } = shipping_address.into_destruct();
        Self {
            id: id.into(),
            order_number: number.into(),
            user_id: user_id.into(),
            status: status.to_string(),
            subtotal: subtotal.into(),
            tax: tax.into(),
            shipping: shipping.into(),
            total: total.into(),
            address,
            city,
            postal_code,
            phone,
            payment_method: payment_method.to_string(),
            notes: notes.map(Into::into),
            items: items.into_iter().map(OrderItemDto::from).collect(),
            created_at: created_at.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerDto {
    pub user_id: Uuid,
    pub admin: bool,
}

impl From<Caller> for CallerDto {
    fn from(value: Caller) -> Self {
        let DestructCaller { user_id, role } = value.into_destruct();
        Self {
            user_id: user_id.into(),
            admin: role == UserRole::Admin,
        }
    }
}

pub struct CheckoutDto {
    pub user_id: Uuid,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

pub struct GetOrderDto {
    pub caller: CallerDto,
    pub id: Uuid,
}

#[derive(Default)]
pub struct ListOrdersDto {
    pub status: Option<String>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

impl ListOrdersDto {
    pub fn limit(&self) -> SelectLimit {
        self.limit.map(SelectLimit::new).unwrap_or_default()
    }

    pub fn offset(&self) -> SelectOffset {
        SelectOffset::from_page(self.page.unwrap_or(1), &self.limit())
    }
}

pub struct ListOwnOrdersDto {
    pub user_id: Uuid,
    pub filter: ListOrdersDto,
}

pub struct UpdateOrderStatusDto {
    pub id: Uuid,
    pub status: String,
}

pub struct ResolveCallerDto {
    pub token: String,
}

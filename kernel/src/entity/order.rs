mod address;
mod filter;
mod id;
mod item;
mod payment;
mod pricing;
mod status;

pub use self::{address::*, filter::*, id::*, item::*, payment::*, pricing::*, status::*};
use crate::entity::{Cart, CreatedAt, UserId};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use vodca::{AsRefln, Fromln, References};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct OrderNotes(String);

impl OrderNotes {
    pub fn new(notes: impl Into<String>) -> Self {
        Self(notes.into())
    }
}

/// A placed order. Totals and line items are frozen when the order is placed;
/// only `status` changes afterwards.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Order {
    id: OrderId,
    number: OrderNumber,
    user_id: UserId,
    status: OrderStatus,
    totals: OrderTotals,
    shipping_address: ShippingAddress,
    payment_method: PaymentMethod,
    notes: Option<OrderNotes>,
    items: Vec<OrderItem>,
    created_at: CreatedAt<Order>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        number: OrderNumber,
        user_id: UserId,
        status: OrderStatus,
        totals: OrderTotals,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        notes: Option<OrderNotes>,
        items: Vec<OrderItem>,
        created_at: CreatedAt<Order>,
    ) -> Self {
        Self {
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
        }
    }

    /// Snapshots `cart` into a new pending order priced by `policy`.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        id: OrderId,
        number: OrderNumber,
        cart: &Cart,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        notes: Option<OrderNotes>,
        policy: &PricingPolicy,
        created_at: CreatedAt<Order>,
    ) -> error_stack::Result<Self, KernelError> {
        if cart.is_empty() {
            return Err(Report::new(KernelError::EmptyCart));
        }
        let items = cart
            .items()
            .iter()
            .map(OrderItem::from_cart_item)
            .collect::<Vec<_>>();
        let subtotal = items.iter().map(|item| *item.subtotal()).sum();
        Ok(Self {
            id,
            number,
            user_id: cart.user_id().clone(),
            status: OrderStatus::Pending,
            totals: policy.quote(subtotal),
            shipping_address,
            payment_method,
            notes,
            items,
            created_at,
        })
    }

    pub fn with_number(self, number: OrderNumber) -> Self {
        let mut order = self.into_destruct();
        order.number = number;
        order.freeze()
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::entity::{
        BookId, BookTitle, Cart, CartId, CartItem, CartItemId, CreatedAt, Money, Order, OrderId,
        OrderNumber, OrderStatus, PaymentMethod, PricingPolicy, Quantity, ShippingAddress, UserId,
    };
    use crate::KernelError;

    fn address() -> ShippingAddress {
        ShippingAddress::new("Av. Reforma 222", "CDMX", "06600", "5512345678")
    }

    fn line(quantity: i32, unit_price: Money) -> CartItem {
        CartItem::new(
            CartItemId::new(Uuid::new_v4()),
            BookId::new(Uuid::new_v4()),
            BookTitle::new("book"),
            Quantity::new(quantity),
            unit_price,
            CreatedAt::now(),
        )
    }

    #[test]
    fn place_snapshots_cart_and_prices_it() {
        let user = UserId::new(Uuid::new_v4());
        let cart = Cart::new(
            CartId::new(Uuid::new_v4()),
            user.clone(),
            vec![
                line(2, Money::new(dec!(25.00))),
                line(1, Money::new(dec!(60.00))),
            ],
        );
        let order = Order::place(
            OrderId::new(Uuid::new_v4()),
            OrderNumber::new("ORD-1-AAAAAA"),
            &cart,
            address(),
            PaymentMethod::Card,
            None,
            &PricingPolicy::default(),
            CreatedAt::now(),
        )
        .unwrap();

        assert_eq!(order.user_id(), &user);
        assert_eq!(order.status(), &OrderStatus::Pending);
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.totals().subtotal(), &Money::new(dec!(110.00)));
        assert_eq!(order.totals().tax(), &Money::new(dec!(19.80)));
        assert_eq!(order.totals().shipping(), &Money::zero());
        assert_eq!(order.totals().total(), &Money::new(dec!(129.80)));

        let line_sum: Money = order.items().iter().map(|item| *item.subtotal()).sum();
        assert_eq!(&line_sum, order.totals().subtotal());
    }

    #[test]
    fn empty_cart_cannot_be_placed() {
        let cart = Cart::new(
            CartId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            vec![],
        );
        let error = Order::place(
            OrderId::new(Uuid::new_v4()),
            OrderNumber::new("ORD-1-AAAAAA"),
            &cart,
            address(),
            PaymentMethod::Card,
            None,
            &PricingPolicy::default(),
            CreatedAt::now(),
        )
        .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::EmptyCart));
    }
}

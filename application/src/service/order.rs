use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, CartQuery, DependOnBookQuery, DependOnCartQuery, DependOnOrderQuery, OrderQuery,
};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier,
    DependOnOrderModifier, OrderModifier,
};
use kernel::prelude::entity::{
    CreatedAt, Order, OrderFilter, OrderId, OrderNotes, OrderNumber, OrderStatus, PaymentMethod,
    PricingPolicy, ShippingAddress, UserId,
};
use kernel::KernelError;

use crate::transfer::{
    CheckoutDto, GetOrderDto, ListOrdersDto, ListOwnOrdersDto, OrderDto, UpdateOrderStatusDto,
};

const ORDER_NUMBER_ATTEMPTS: usize = 5;

#[async_trait::async_trait]
pub trait CheckoutService:
    'static
    + Sync
    + Send
    + DependOnCartQuery
    + DependOnCartModifier
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnOrderModifier
{
    /// Turns the caller's cart into an order. Stock reservation, the order
    /// rows and emptying the cart share one transaction: either all of them
    /// are committed or none is.
    async fn checkout(
        &self,
        policy: &PricingPolicy,
        dto: CheckoutDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let shipping_address =
            ShippingAddress::new(dto.address, dto.city, dto.postal_code, dto.phone).validated()?;
        let payment_method = dto
            .payment_method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()?
            .unwrap_or_default();
        let notes = dto
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty())
            .map(OrderNotes::new);
        let user_id = UserId::new(dto.user_id);

        let mut connection = self.database_connection().transact().await?;

        let cart = self
            .cart_query()
            .find_by_user_for_update(&mut connection, &user_id)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or_else(|| Report::new(KernelError::EmptyCart))?;

        // Reserve in book id order so concurrent checkouts lock rows consistently.
        let mut lines = cart.items().iter().collect::<Vec<_>>();
        lines.sort_by(|a, b| a.book_id().cmp(b.book_id()));
        for line in lines {
            let reserved = self
                .book_modifier()
                .reserve_stock(&mut connection, line.book_id(), line.quantity())
                .await?;
            if reserved {
                continue;
            }

            let book = self
                .book_query()
                .find_by_id(&mut connection, line.book_id())
                .await?;
            let (title, available): (String, i32) = match book {
                Some(book) if book.is_purchasable() => {
                    (book.title().clone().into(), *book.stock().as_ref())
                }
                Some(book) => (book.title().clone().into(), 0),
                None => (line.title().clone().into(), 0),
            };
            connection.roll_back().await?;
            tracing::warn!(
                user_id = %dto.user_id,
                title = %title,
                requested = *line.quantity().as_ref(),
                available,
                "checkout rejected for insufficient stock"
            );
            return Err(Report::new(KernelError::InsufficientStock { title, available }));
        }

        let mut order = Order::place(
            OrderId::new(Uuid::new_v4()),
            next_order_number(),
            &cart,
            shipping_address,
            payment_method,
            notes,
            policy,
            CreatedAt::now(),
        )?;

        let mut attempts = 1;
        while !self.order_modifier().create(&mut connection, &order).await? {
            if attempts >= ORDER_NUMBER_ATTEMPTS {
                return Err(Report::new(KernelError::Internal).attach_printable(format!(
                    "no unique order number after {attempts} attempts"
                )));
            }
            attempts += 1;
            tracing::debug!(
                order_number = %order.number(),
                "order number taken, regenerating"
            );
            order = order.with_number(next_order_number());
        }

        let removed = self
            .cart_modifier()
            .clear(&mut connection, cart.id())
            .await?;
        if removed != cart.items().len() as u64 {
            connection.roll_back().await?;
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "cart changed during checkout: expected {} lines, removed {removed}",
                cart.items().len()
            )));
        }
        connection.commit().await?;

        tracing::info!(
            order_number = %order.number(),
            user_id = %dto.user_id,
            total = %order.totals().total(),
            "order placed"
        );

        Ok(OrderDto::from(order))
    }
}

impl<T> CheckoutService for T where
    T: DependOnCartQuery
        + DependOnCartModifier
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnOrderModifier
{
}

fn next_order_number() -> OrderNumber {
    OrderNumber::generate(OffsetDateTime::now_utc(), &mut rand::thread_rng())
}

#[async_trait::async_trait]
pub trait GetOrderService: 'static + Sync + Send + DependOnOrderQuery {
    /// Orders of other users read as missing unless the caller is an admin.
    async fn get_order(&self, dto: GetOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = OrderId::new(dto.id);
        let caller = UserId::new(dto.caller.user_id);
        let order = self
            .order_query()
            .find_by_id(&mut connection, &id)
            .await?
            .filter(|order| dto.caller.admin || order.user_id() == &caller)
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("order {} not found", dto.id))
            })?;

        Ok(OrderDto::from(order))
    }
}

impl<T> GetOrderService for T where T: DependOnOrderQuery {}

#[async_trait::async_trait]
pub trait ListOrdersService: 'static + Sync + Send + DependOnOrderQuery {
    async fn list_own_orders(
        &self,
        dto: ListOwnOrdersDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let filter = order_filter(&dto.filter)?;
        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let orders = self
            .order_query()
            .find_by_user(&mut connection, &user_id, &filter)
            .await?;

        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    async fn list_all_orders(
        &self,
        dto: ListOrdersDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let filter = order_filter(&dto)?;
        let mut connection = self.database_connection().transact().await?;

        let orders = self.order_query().find_all(&mut connection, &filter).await?;

        Ok(orders.into_iter().map(OrderDto::from).collect())
    }
}

impl<T> ListOrdersService for T where T: DependOnOrderQuery {}

fn order_filter(dto: &ListOrdersDto) -> error_stack::Result<OrderFilter, KernelError> {
    let status = dto
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;
    Ok(OrderFilter {
        status,
        limit: dto.limit(),
        offset: dto.offset(),
    })
}

#[async_trait::async_trait]
pub trait UpdateOrderStatusService:
    'static + Sync + Send + DependOnOrderQuery + DependOnOrderModifier
{
    async fn update_order_status(
        &self,
        dto: UpdateOrderStatusDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let requested = dto.status.parse::<OrderStatus>()?;

        let mut connection = self.database_connection().transact().await?;

        let id = OrderId::new(dto.id);
        let not_found = || {
            Report::new(KernelError::NotFound).attach_printable(format!("order {} not found", dto.id))
        };
        let order = self
            .order_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(not_found)?;

        let current = *order.status();
        let next = current.transition_to(requested)?;
        if !self
            .order_modifier()
            .update_status(&mut connection, &id, &current, &next)
            .await?
        {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("order {} changed concurrently", dto.id)));
        }

        let order = self
            .order_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(not_found)?;
        connection.commit().await?;
        tracing::info!(order_id = %dto.id, from = %current, to = %next, "order status updated");

        Ok(OrderDto::from(order))
    }
}

impl<T> UpdateOrderStatusService for T where T: DependOnOrderQuery + DependOnOrderModifier {}

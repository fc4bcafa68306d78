use std::collections::HashMap;

use error_stack::Report;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    BookId, BookTitle, CreatedAt, Money, Order, OrderFilter, OrderId, OrderItem, OrderNotes,
    OrderNumber, OrderStatus, OrderTotals, PaymentMethod, Quantity, ShippingAddress, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_by_id(con, id).await
    }

    async fn find_by_user(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        filter: &OrderFilter,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_many(con, Some(user_id), filter).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        filter: &OrderFilter,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_many(con, None, filter).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<bool, KernelError> {
        PgOrderInternal::create(con, order).await
    }

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        id: &OrderId,
        from: &OrderStatus,
        to: &OrderStatus,
    ) -> error_stack::Result<bool, KernelError> {
        PgOrderInternal::update_status(con, id, from, to).await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
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
    created_at: OffsetDateTime,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> error_stack::Result<Order, KernelError> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|report| report.change_context(KernelError::Internal))?;
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|report| report.change_context(KernelError::Internal))?;
        Ok(Order::new(
            OrderId::new(self.id),
            OrderNumber::new(self.order_number),
            UserId::new(self.user_id),
            status,
            OrderTotals::new(
                Money::new(self.subtotal),
                Money::new(self.tax),
                Money::new(self.shipping),
                Money::new(self.total),
            ),
            ShippingAddress::new(self.address, self.city, self.postal_code, self.phone),
            payment_method,
            self.notes.map(OrderNotes::new),
            items,
            CreatedAt::new(self.created_at),
        ))
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    book_id: Uuid,
    title: String,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem::new(
            BookId::new(row.book_id),
            BookTitle::new(row.title),
            Quantity::new(row.quantity),
            Money::new(row.unit_price),
            Money::new(row.subtotal),
        )
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, order_number, user_id, status, subtotal, tax, shipping, total,
                   address, city, postal_code, phone, payment_method, notes, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut items = Self::find_items(con, &[row.id]).await?;
        let items = items.remove(&row.id).unwrap_or_default();
        row.into_order(items).map(Some)
    }

    async fn find_many(
        con: &mut PgConnection,
        user_id: Option<&UserId>,
        filter: &OrderFilter,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, order_number, user_id, status, subtotal, tax, shipping, total,
                   address, city, postal_code, phone, payment_method, notes, created_at
            FROM orders
            WHERE ($1::UUID IS NULL OR user_id = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC, order_number DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id.map(AsRef::<Uuid>::as_ref))
        .bind(filter.status.map(|status| status.as_str()))
        .bind(i64::from(*filter.limit.as_ref()))
        .bind(i64::from(*filter.offset.as_ref()))
        .fetch_all(&mut *con)
        .await
        .convert_error()?;

        let ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
        let mut items = Self::find_items(con, &ids).await?;
        rows.into_iter()
            .map(|row| {
                let lines = items.remove(&row.id).unwrap_or_default();
                row.into_order(lines)
            })
            .collect()
    }

    async fn find_items(
        con: &mut PgConnection,
        order_ids: &[Uuid],
    ) -> error_stack::Result<HashMap<Uuid, Vec<OrderItem>>, KernelError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, OrderItemRow>(
            // language=postgresql
            r#"
            SELECT order_id, book_id, title, quantity, unit_price, subtotal
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(order_ids)
        .fetch_all(con)
        .await
        .convert_error()?;

        let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            items.entry(row.order_id).or_default().push(OrderItem::from(row));
        }
        Ok(items)
    }

    async fn create(con: &mut PgConnection, order: &Order) -> error_stack::Result<bool, KernelError> {
        let totals = order.totals();
        let address = order.shipping_address();
        let inserted = sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO orders (id, order_number, user_id, status, subtotal, tax, shipping, total,
                                address, city, postal_code, phone, payment_method, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (order_number) DO NOTHING
            "#,
        )
        .bind(order.id().as_ref())
        .bind(AsRef::<String>::as_ref(order.number()))
        .bind(order.user_id().as_ref())
        .bind(order.status().as_str())
        .bind(totals.subtotal().as_ref())
        .bind(totals.tax().as_ref())
        .bind(totals.shipping().as_ref())
        .bind(totals.total().as_ref())
        .bind(address.address())
        .bind(address.city())
        .bind(address.postal_code())
        .bind(address.phone())
        .bind(order.payment_method().as_str())
        .bind(order.notes().as_ref().map(AsRef::<String>::as_ref))
        .bind(order.created_at().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        if inserted.rows_affected() == 0 {
            return Ok(false);
        }

        for (position, item) in order.items().iter().enumerate() {
            let position = i32::try_from(position).map_err(|error| {
                Report::new(error).change_context(KernelError::Internal)
            })?;
            sqlx::query(
                // language=postgresql
                r#"
                INSERT INTO order_items (order_id, position, book_id, title, quantity, unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(order.id().as_ref())
            .bind(position)
            .bind(item.book_id().as_ref())
            .bind(AsRef::<String>::as_ref(item.title()))
            .bind(item.quantity().as_ref())
            .bind(item.unit_price().as_ref())
            .bind(item.subtotal().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }
        Ok(true)
    }

    async fn update_status(
        con: &mut PgConnection,
        id: &OrderId,
        from: &OrderStatus,
        to: &OrderStatus,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE orders
            SET status = $3, updated_at = now()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id.as_ref())
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::{BookModifier, OrderModifier};
    use kernel::prelude::entity::{
        Cart, CartId, CartItem, CartItemId, CreatedAt, Money, Order, OrderFilter, OrderId,
        OrderNumber, OrderStatus, PaymentMethod, PricingPolicy, Quantity, ShippingAddress, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::auth::test::user_fixture;
    use crate::database::postgres::book::test::book_fixture;
    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresOrderRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_read_and_transition() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut connection = db.transact().await?;

        let user_id = UserId::new(user_fixture(&mut connection, "customer").await?);
        let book = book_fixture(&mut connection, 5).await?;
        PostgresBookRepository
            .create(&mut connection, &book, &[])
            .await?;

        let cart = Cart::new(
            CartId::new(Uuid::new_v4()),
            user_id.clone(),
            vec![CartItem::new(
                CartItemId::new(Uuid::new_v4()),
                book.id().clone(),
                book.title().clone(),
                Quantity::new(2),
                Money::new(dec!(20.00)),
                CreatedAt::now(),
            )],
        );
        let number = OrderNumber::new(format!("ORD-0-{}", Uuid::new_v4().simple()));
        let order = Order::place(
            OrderId::new(Uuid::new_v4()),
            number.clone(),
            &cart,
            ShippingAddress::new("Calle 1", "Lima", "15001", "999888777"),
            PaymentMethod::Paypal,
            None,
            &PricingPolicy::default(),
            CreatedAt::now(),
        )?;
        assert!(
            PostgresOrderRepository
                .create(&mut connection, &order)
                .await?
        );

        let duplicate = Order::new(
            OrderId::new(Uuid::new_v4()),
            number,
            user_id.clone(),
            OrderStatus::Pending,
            *order.totals(),
            order.shipping_address().clone(),
            PaymentMethod::Cash,
            None,
            order.items().clone(),
            CreatedAt::now(),
        );
        assert!(
            !PostgresOrderRepository
                .create(&mut connection, &duplicate)
                .await?
        );

        let found = PostgresOrderRepository
            .find_by_id(&mut connection, order.id())
            .await?
            .unwrap();
        assert_eq!(found.items(), order.items());
        assert_eq!(found.totals(), order.totals());

        let own = PostgresOrderRepository
            .find_by_user(&mut connection, &user_id, &OrderFilter::default())
            .await?;
        assert_eq!(own.len(), 1);

        assert!(
            PostgresOrderRepository
                .update_status(
                    &mut connection,
                    order.id(),
                    &OrderStatus::Pending,
                    &OrderStatus::Processing
                )
                .await?
        );
        assert!(
            !PostgresOrderRepository
                .update_status(
                    &mut connection,
                    order.id(),
                    &OrderStatus::Pending,
                    &OrderStatus::Cancelled
                )
                .await?
        );

        Ok(())
    }
}

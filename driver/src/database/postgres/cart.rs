use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::CartQuery;
use kernel::interface::update::CartModifier;
use kernel::prelude::entity::{
    BookId, BookTitle, Cart, CartId, CartItem, CartItemId, CreatedAt, Money, Quantity, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresCartRepository;

#[async_trait::async_trait]
impl CartQuery for PostgresCartRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_user(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Cart>, KernelError> {
        PgCartInternal::find_by_user(con, user_id, false).await
    }

    async fn find_by_user_for_update(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Cart>, KernelError> {
        PgCartInternal::find_by_user(con, user_id, true).await
    }
}

#[async_trait::async_trait]
impl CartModifier for PostgresCartRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        cart_id: &CartId,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::create(con, cart_id, user_id).await
    }

    async fn add_item(
        &self,
        con: &mut PostgresTransaction,
        cart_id: &CartId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::add_item(con, cart_id, item).await
    }

    async fn update_quantity(
        &self,
        con: &mut PostgresTransaction,
        cart_id: &CartId,
        item_id: &CartItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::update_quantity(con, cart_id, item_id, quantity).await
    }

    async fn remove_item(
        &self,
        con: &mut PostgresTransaction,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::remove_item(con, cart_id, item_id).await
    }

    async fn clear(
        &self,
        con: &mut PostgresTransaction,
        cart_id: &CartId,
    ) -> error_stack::Result<u64, KernelError> {
        PgCartInternal::clear(con, cart_id).await
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: Uuid,
    book_id: Uuid,
    title: String,
    quantity: i32,
    unit_price: Decimal,
    added_at: OffsetDateTime,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        CartItem::new(
            CartItemId::new(row.id),
            BookId::new(row.book_id),
            BookTitle::new(row.title),
            Quantity::new(row.quantity),
            Money::new(row.unit_price),
            CreatedAt::new(row.added_at),
        )
    }
}

pub(in crate::database) struct PgCartInternal;

impl PgCartInternal {
    async fn find_by_user(
        con: &mut PgConnection,
        user_id: &UserId,
        lock: bool,
    ) -> error_stack::Result<Option<Cart>, KernelError> {
        let query = if lock {
            // language=postgresql
            r#"
            SELECT id
            FROM carts
            WHERE user_id = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT id
            FROM carts
            WHERE user_id = $1
            "#
        };
        let cart = sqlx::query_as::<_, (Uuid,)>(query)
            .bind(user_id.as_ref())
            .fetch_optional(&mut *con)
            .await
            .convert_error()?;
        let Some((cart_id,)) = cart else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, CartItemRow>(
            // language=postgresql
            r#"
            SELECT ci.id, ci.book_id, b.title, ci.quantity, ci.unit_price, ci.added_at
            FROM cart_items ci
            JOIN books b ON b.id = ci.book_id
            WHERE ci.cart_id = $1
            ORDER BY ci.added_at, ci.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(con)
        .await
        .convert_error()?;

        Ok(Some(Cart::new(
            CartId::new(cart_id),
            user_id.clone(),
            items.into_iter().map(CartItem::from).collect(),
        )))
    }

    async fn create(
        con: &mut PgConnection,
        cart_id: &CartId,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO carts (id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(cart_id.as_ref())
        .bind(user_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn add_item(
        con: &mut PgConnection,
        cart_id: &CartId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO cart_items (id, cart_id, book_id, quantity, unit_price, added_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.id().as_ref())
        .bind(cart_id.as_ref())
        .bind(item.book_id().as_ref())
        .bind(item.quantity().as_ref())
        .bind(item.unit_price().as_ref())
        .bind(item.added_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_quantity(
        con: &mut PgConnection,
        cart_id: &CartId,
        item_id: &CartItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE cart_items
            SET quantity = $3
            WHERE cart_id = $1 AND id = $2
            "#,
        )
        .bind(cart_id.as_ref())
        .bind(item_id.as_ref())
        .bind(quantity.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn remove_item(
        con: &mut PgConnection,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM cart_items
            WHERE cart_id = $1 AND id = $2
            "#,
        )
        .bind(cart_id.as_ref())
        .bind(item_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn clear(con: &mut PgConnection, cart_id: &CartId) -> error_stack::Result<u64, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM cart_items
            WHERE cart_id = $1
            "#,
        )
        .bind(cart_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::CartQuery;
    use kernel::interface::update::{BookModifier, CartModifier};
    use kernel::prelude::entity::{
        CartId, CartItem, CartItemId, CreatedAt, Money, Quantity, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::auth::test::user_fixture;
    use crate::database::postgres::book::test::book_fixture;
    use crate::database::postgres::{
        PostgresBookRepository, PostgresCartRepository, PostgresDatabase,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn cart_lines_lifecycle() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut connection = db.transact().await?;

        let user_id = UserId::new(user_fixture(&mut connection, "customer").await?);
        let book = book_fixture(&mut connection, 5).await?;
        PostgresBookRepository
            .create(&mut connection, &book, &[])
            .await?;

        assert!(PostgresCartRepository
            .find_by_user(&mut connection, &user_id)
            .await?
            .is_none());

        let cart_id = CartId::new(Uuid::new_v4());
        PostgresCartRepository
            .create(&mut connection, &cart_id, &user_id)
            .await?;
        let item = CartItem::new(
            CartItemId::new(Uuid::new_v4()),
            book.id().clone(),
            book.title().clone(),
            Quantity::new(2),
            Money::new(dec!(20.00)),
            CreatedAt::now(),
        );
        PostgresCartRepository
            .add_item(&mut connection, &cart_id, &item)
            .await?;
        PostgresCartRepository
            .update_quantity(&mut connection, &cart_id, item.id(), &Quantity::new(3))
            .await?;

        let cart = PostgresCartRepository
            .find_by_user(&mut connection, &user_id)
            .await?
            .unwrap();
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.subtotal(), Money::new(dec!(60.00)));

        let removed = PostgresCartRepository
            .clear(&mut connection, &cart_id)
            .await?;
        assert_eq!(removed, 1);
        assert_eq!(
            PostgresCartRepository
                .clear(&mut connection, &cart_id)
                .await?,
            0
        );

        Ok(())
    }
}

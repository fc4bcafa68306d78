//! Services racing each other over one database.

use rust_decimal_macros::dec;
use uuid::Uuid;

use application::service::{AddCartItemService, CheckoutService, GetCartService};
use application::transfer::{AddCartItemDto, CheckoutDto, GetCartDto};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::PricingPolicy;
use kernel::KernelError;

use crate::database::postgres::auth::test::user_fixture;
use crate::database::postgres::book::test::book_fixture;
use crate::database::postgres::{PostgresBookRepository, PostgresDatabase};
use crate::error::ConvertError;

fn checkout_dto(user_id: Uuid) -> CheckoutDto {
    CheckoutDto {
        user_id,
        address: "Av. Arequipa 1200".to_string(),
        city: "Lima".to_string(),
        postal_code: "15046".to_string(),
        phone: "987654321".to_string(),
        payment_method: None,
        notes: None,
    }
}

/// Commits a book with `stock` units and returns its id.
async fn committed_book(
    db: &PostgresDatabase,
    stock: i32,
) -> error_stack::Result<Uuid, KernelError> {
    let mut connection = db.transact().await?;
    let book = book_fixture(&mut connection, stock).await?;
    PostgresBookRepository
        .create(&mut connection, &book, &[])
        .await?;
    connection.commit().await?;
    Ok(book.id().clone().into())
}

async fn committed_user(db: &PostgresDatabase) -> error_stack::Result<Uuid, KernelError> {
    let mut connection = db.transact().await?;
    let id = user_fixture(&mut connection, "customer").await?;
    connection.commit().await?;
    Ok(id)
}

async fn add(
    db: &PostgresDatabase,
    user_id: Uuid,
    book_id: Uuid,
    quantity: i32,
) -> error_stack::Result<(), KernelError> {
    db.add_cart_item(AddCartItemDto {
        user_id,
        book_id,
        quantity,
    })
    .await
    .map(|_| ())
}

async fn stock_and_orders(
    db: &PostgresDatabase,
    book_id: Uuid,
) -> error_stack::Result<(i32, i64), KernelError> {
    let mut connection = db.transact().await?;
    sqlx::query_as::<_, (i32, i64)>(
        // language=postgresql
        r#"
        SELECT b.stock, (SELECT COUNT(*) FROM order_items oi WHERE oi.book_id = b.id)
        FROM books b
        WHERE b.id = $1
        "#,
    )
    .bind(book_id)
    .fetch_one(&mut *connection)
    .await
    .convert_error()
}

#[test_with::env(POSTGRES_TEST)]
#[tokio::test]
async fn last_unit_goes_to_one_buyer() -> error_stack::Result<(), KernelError> {
    let db = PostgresDatabase::new().await?;
    db.migrate().await?;
    let book_id = committed_book(&db, 1).await?;
    let first = committed_user(&db).await?;
    let second = committed_user(&db).await?;
    add(&db, first, book_id, 1).await?;
    add(&db, second, book_id, 1).await?;

    let policy = PricingPolicy::default();
    let (a, b) = tokio::join!(
        db.checkout(&policy, checkout_dto(first)),
        db.checkout(&policy, checkout_dto(second))
    );

    assert!(a.is_ok() != b.is_ok());
    let failed = a.err().or(b.err()).unwrap();
    assert!(matches!(
        failed.current_context(),
        KernelError::InsufficientStock { available: 0, .. }
    ));
    assert_eq!(stock_and_orders(&db, book_id).await?, (0, 1));

    Ok(())
}

#[test_with::env(POSTGRES_TEST)]
#[tokio::test]
async fn one_cart_checked_out_twice_places_one_order() -> error_stack::Result<(), KernelError> {
    let db = PostgresDatabase::new().await?;
    db.migrate().await?;
    let book_id = committed_book(&db, 10).await?;
    let user_id = committed_user(&db).await?;
    add(&db, user_id, book_id, 2).await?;

    let policy = PricingPolicy::default();
    let (a, b) = tokio::join!(
        db.checkout(&policy, checkout_dto(user_id)),
        db.checkout(&policy, checkout_dto(user_id))
    );

    assert!(a.is_ok() != b.is_ok());
    let failed = a.err().or(b.err()).unwrap();
    assert!(matches!(
        failed.current_context(),
        KernelError::EmptyCart | KernelError::Concurrency
    ));
    assert_eq!(stock_and_orders(&db, book_id).await?, (8, 1));
    let cart = db.get_cart(GetCartDto { user_id }).await?;
    assert!(cart.items.is_empty());

    Ok(())
}

#[test_with::env(POSTGRES_TEST)]
#[tokio::test]
async fn concurrent_adds_merge_into_one_line() -> error_stack::Result<(), KernelError> {
    let db = PostgresDatabase::new().await?;
    db.migrate().await?;
    let book_id = committed_book(&db, 10).await?;
    let user_id = committed_user(&db).await?;

    let (a, b) = tokio::join!(add(&db, user_id, book_id, 1), add(&db, user_id, book_id, 1));
    a?;
    b?;
    let (a, b) = tokio::join!(add(&db, user_id, book_id, 2), add(&db, user_id, book_id, 3));
    a?;
    b?;

    let cart = db.get_cart(GetCartDto { user_id }).await?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 7);
    assert_eq!(cart.items[0].unit_price, dec!(20.00));
    assert_eq!(cart.total_items, 7);

    Ok(())
}

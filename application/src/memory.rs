//! Transactional in-memory store backing the service tests. Transactions are
//! serialised by a single lock; writes go to a staged copy that replaces the
//! shared state on commit and is discarded on drop.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use error_stack::Report;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    AuthQuery, BookQuery, CartQuery, DependOnAuthQuery, DependOnBookQuery, DependOnCartQuery,
    DependOnOrderQuery, OrderQuery,
};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier,
    DependOnOrderModifier, OrderModifier,
};
use kernel::prelude::entity::{
    AuthorId, Book, BookFeatured, BookFilter, BookId, BookRating, BookSlug, BookStock,
    BookSummary, BookTitle, Caller, Cart, CartId, CartItem, CartItemId, CategoryId, DestructBook,
    EditorialId, IsActive, Money, Order, OrderFilter, OrderId, OrderStatus, Quantity, UserId,
};
use kernel::KernelError;

pub fn book(title: &str, price: Decimal, stock: i32) -> Book {
    Book::new(
        BookId::new(Uuid::new_v4()),
        BookTitle::new(title),
        BookSlug::from_title(title),
        AuthorId::new(Uuid::new_v4()),
        EditorialId::new(Uuid::new_v4()),
        None,
        Money::new(price),
        None,
        BookStock::new(stock),
        BookFeatured::new(false),
        BookRating::default(),
        IsActive::new(true),
    )
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub books: BTreeMap<BookId, Book>,
    pub carts: HashMap<UserId, Cart>,
    pub orders: Vec<Order>,
    /// Users by id with their active flag.
    pub users: HashMap<UserId, (Caller, bool)>,
}

impl Store {
    pub fn stock_of(&self, id: Uuid) -> i32 {
        self.books
            .get(&BookId::new(id))
            .map(|book| *book.stock().as_ref())
            .unwrap_or_default()
    }

    fn edit_book(&mut self, id: &BookId, edit: impl FnOnce(&mut DestructBook)) -> bool {
        let Some(book) = self.books.remove(id) else {
            return false;
        };
        let mut book = book.into_destruct();
        edit(&mut book);
        self.books.insert(id.clone(), book.freeze());
        true
    }

    fn edit_cart(&mut self, id: &CartId, edit: impl FnOnce(&mut Vec<CartItem>)) {
        if let Some(cart) = self.carts.values_mut().find(|cart| cart.id() == id) {
            let mut destructed = cart.clone().into_destruct();
            edit(&mut destructed.items);
            *cart = destructed.freeze();
        }
    }

    fn matches(book: &Book, filter: &BookFilter) -> bool {
        let search = filter
            .search
            .as_deref()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());
        let title: &String = book.title().as_ref();
        book.is_purchasable()
            && (!filter.featured || *book.featured().as_ref())
            && search.map_or(true, |term| title.to_lowercase().contains(&term))
            && filter.author_id.as_ref().map_or(true, |id| book.author_id() == id)
            && filter
                .editorial_id
                .as_ref()
                .map_or(true, |id| book.editorial_id() == id)
            && filter
                .min_price
                .map_or(true, |min| book.effective_price() >= min)
            && filter
                .max_price
                .map_or(true, |max| book.effective_price() <= max)
    }
}

/// Knobs for injecting storage misbehaviour.
#[derive(Debug, Default)]
pub struct Faults {
    /// Number of upcoming order inserts that report a taken order number.
    pub order_number_collisions: AtomicUsize,
    pub fail_order_insert: AtomicBool,
    /// Number of cart lines another writer deletes right before the next clear.
    pub cart_lines_removed_elsewhere: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<Store>>,
    faults: Arc<Faults>,
    repository: InMemoryRepository,
}

impl InMemoryDatabase {
    pub async fn seed(&self, seed: impl FnOnce(&mut Store)) {
        seed(&mut *self.store.lock().await);
    }

    pub async fn snapshot(&self) -> Store {
        self.store.lock().await.clone()
    }

    pub fn faults(&self) -> &Faults {
        &self.faults
    }

    pub async fn insert_book(&self, book: Book) -> Uuid {
        let id = book.id().clone();
        self.seed(|store| {
            store.books.insert(id.clone(), book);
        })
        .await;
        id.into()
    }

    pub async fn set_stock(&self, id: Uuid, stock: i32) {
        self.seed(|store| {
            store.edit_book(&BookId::new(id), |book| book.stock = BookStock::new(stock));
        })
        .await;
    }

    pub async fn set_price(&self, id: Uuid, price: Decimal) {
        self.seed(|store| {
            store.edit_book(&BookId::new(id), |book| book.price = Money::new(price));
        })
        .await;
    }

    pub async fn set_discount(&self, id: Uuid, discount_price: Decimal) {
        self.seed(|store| {
            store.edit_book(&BookId::new(id), |book| {
                book.discount_price = Some(Money::new(discount_price))
            });
        })
        .await;
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Store>,
    staged: Store,
    faults: Arc<Faults>,
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = self.store.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            staged,
            faults: self.faults.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let InMemoryTransaction {
            mut guard, staged, ..
        } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.staged.books.get(id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        BookQuery::find_by_id(self, con, id).await
    }

    async fn find_summary_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<BookSummary>, KernelError> {
        Ok(con
            .staged
            .books
            .get(id)
            .map(|book| BookSummary::new(book.clone(), None, None, Vec::new())))
    }

    async fn find_by_slug(
        &self,
        con: &mut Self::Transaction,
        slug: &BookSlug,
    ) -> error_stack::Result<Option<BookSummary>, KernelError> {
        Ok(con
            .staged
            .books
            .values()
            .find(|book| book.slug() == slug)
            .map(|book| BookSummary::new(book.clone(), None, None, Vec::new())))
    }

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        filter: &BookFilter,
    ) -> error_stack::Result<Vec<BookSummary>, KernelError> {
        Ok(con
            .staged
            .books
            .values()
            .filter(|book| Store::matches(book, filter))
            .skip(*filter.offset.as_ref() as usize)
            .take(*filter.limit.as_ref() as usize)
            .map(|book| BookSummary::new(book.clone(), None, None, Vec::new()))
            .collect())
    }

    async fn count(
        &self,
        con: &mut Self::Transaction,
        filter: &BookFilter,
    ) -> error_stack::Result<i64, KernelError> {
        Ok(con
            .staged
            .books
            .values()
            .filter(|book| Store::matches(book, filter))
            .count() as i64)
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
        _categories: &[CategoryId],
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.books.values().any(|other| other.slug() == book.slug()) {
            return Err(Report::new(KernelError::Concurrency));
        }
        con.staged.books.insert(book.id().clone(), book.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.staged.books.insert(book.id().clone(), book.clone());
        Ok(())
    }

    async fn deactivate(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con
            .staged
            .edit_book(book_id, |book| book.active = IsActive::new(false)))
    }

    async fn reserve_stock(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<bool, KernelError> {
        let reservable = con
            .staged
            .books
            .get(book_id)
            .is_some_and(|book| book.is_purchasable() && book.can_supply(quantity));
        if !reservable {
            return Ok(false);
        }
        Ok(con.staged.edit_book(book_id, |book| {
            book.stock = BookStock::new(*book.stock.as_ref() - *quantity.as_ref())
        }))
    }
}

#[async_trait::async_trait]
impl CartQuery for InMemoryRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_user(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Cart>, KernelError> {
        let books = &con.staged.books;
        Ok(con.staged.carts.get(user_id).map(|cart| {
            let mut cart = cart.clone().into_destruct();
            for item in cart.items.iter_mut() {
                if let Some(book) = books.get(item.book_id()) {
                    let mut line = item.clone().into_destruct();
                    line.title = book.title().clone();
                    *item = line.freeze();
                }
            }
            cart.freeze()
        }))
    }

    async fn find_by_user_for_update(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Cart>, KernelError> {
        CartQuery::find_by_user(self, con, user_id).await
    }
}

#[async_trait::async_trait]
impl CartModifier for InMemoryRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        con.staged
            .carts
            .entry(user_id.clone())
            .or_insert_with(|| Cart::new(cart_id.clone(), user_id.clone(), Vec::new()));
        Ok(())
    }

    async fn add_item(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        con.staged
            .edit_cart(cart_id, |items| items.push(item.clone()));
        Ok(())
    }

    async fn update_quantity(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        item_id: &CartItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError> {
        con.staged.edit_cart(cart_id, |items| {
            for item in items.iter_mut().filter(|item| item.id() == item_id) {
                let mut line = item.clone().into_destruct();
                line.quantity = *quantity;
                *item = line.freeze();
            }
        });
        Ok(())
    }

    async fn remove_item(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> error_stack::Result<(), KernelError> {
        con.staged
            .edit_cart(cart_id, |items| items.retain(|item| item.id() != item_id));
        Ok(())
    }

    async fn clear(
        &self,
        con: &mut Self::Transaction,
        cart_id: &CartId,
    ) -> error_stack::Result<u64, KernelError> {
        let elsewhere = con.faults.cart_lines_removed_elsewhere.swap(0, Ordering::SeqCst);
        let mut removed = 0;
        con.staged.edit_cart(cart_id, |items| {
            removed = items.len().saturating_sub(elsewhere) as u64;
            items.clear();
        });
        Ok(removed)
    }
}

fn page(mut orders: Vec<Order>, filter: &OrderFilter) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at().as_ref().cmp(a.created_at().as_ref()));
    orders
        .into_iter()
        .filter(|order| filter.status.map_or(true, |status| order.status() == &status))
        .skip(*filter.offset.as_ref() as usize)
        .take(*filter.limit.as_ref() as usize)
        .collect()
}

#[async_trait::async_trait]
impl OrderQuery for InMemoryRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con
            .staged
            .orders
            .iter()
            .find(|order| order.id() == id)
            .cloned())
    }

    async fn find_by_user(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        filter: &OrderFilter,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let own = con
            .staged
            .orders
            .iter()
            .filter(|order| order.user_id() == user_id)
            .cloned()
            .collect();
        Ok(page(own, filter))
    }

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        filter: &OrderFilter,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        Ok(page(con.staged.orders.clone(), filter))
    }
}

#[async_trait::async_trait]
impl OrderModifier for InMemoryRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<bool, KernelError> {
        if con.faults.fail_order_insert.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::Internal).attach_printable("injected failure"));
        }
        let collided = con
            .faults
            .order_number_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if collided
            || con
                .staged
                .orders
                .iter()
                .any(|other| other.number() == order.number())
        {
            return Ok(false);
        }
        con.staged.orders.push(order.clone());
        Ok(true)
    }

    async fn update_status(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
        from: &OrderStatus,
        to: &OrderStatus,
    ) -> error_stack::Result<bool, KernelError> {
        let Some(order) = con
            .staged
            .orders
            .iter_mut()
            .find(|order| order.id() == id && order.status() == from)
        else {
            return Ok(false);
        };
        let mut updated = order.clone().into_destruct();
        updated.status = *to;
        *order = updated.freeze();
        Ok(true)
    }
}

#[async_trait::async_trait]
impl AuthQuery for InMemoryRepository {
    type Transaction = InMemoryTransaction;

    async fn find_caller(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Caller>, KernelError> {
        Ok(con
            .staged
            .users
            .get(user_id)
            .filter(|(_, active)| *active)
            .map(|(caller, _)| caller.clone()))
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &self.repository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.repository
    }
}

impl DependOnCartQuery for InMemoryDatabase {
    type CartQuery = InMemoryRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &self.repository
    }
}

impl DependOnCartModifier for InMemoryDatabase {
    type CartModifier = InMemoryRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &self.repository
    }
}

impl DependOnOrderQuery for InMemoryDatabase {
    type OrderQuery = InMemoryRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &self.repository
    }
}

impl DependOnOrderModifier for InMemoryDatabase {
    type OrderModifier = InMemoryRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &self.repository
    }
}

impl DependOnAuthQuery for InMemoryDatabase {
    type AuthQuery = InMemoryRepository;
    fn auth_query(&self) -> &Self::AuthQuery {
        &self.repository
    }
}

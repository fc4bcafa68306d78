mod featured;
mod filter;
mod id;
mod rating;
mod slug;
mod stock;
mod summary;
mod synopsis;
mod title;

pub use self::{
    featured::*, filter::*, id::*, rating::*, slug::*, stock::*, summary::*, synopsis::*,
    title::*,
};
use crate::entity::{AuthorId, EditorialId, IsActive, Money, Quantity};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    slug: BookSlug,
    author_id: AuthorId,
    editorial_id: EditorialId,
    synopsis: Option<BookSynopsis>,
    price: Money,
    discount_price: Option<Money>,
    stock: BookStock,
    featured: BookFeatured,
    rating: BookRating,
    active: IsActive<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        slug: BookSlug,
        author_id: AuthorId,
        editorial_id: EditorialId,
        synopsis: Option<BookSynopsis>,
        price: Money,
        discount_price: Option<Money>,
        stock: BookStock,
        featured: BookFeatured,
        rating: BookRating,
        active: IsActive<Book>,
    ) -> Self {
        Self {
            id,
            title,
            slug,
            author_id,
            editorial_id,
            synopsis,
            price,
            discount_price,
            stock,
            featured,
            rating,
            active,
        }
    }

    /// Discount price when it is set and lower than the list price.
    pub fn effective_price(&self) -> Money {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    pub fn is_purchasable(&self) -> bool {
        *self.active.as_ref()
    }

    pub fn can_supply(&self, quantity: &Quantity) -> bool {
        self.stock.covers(quantity)
    }
}

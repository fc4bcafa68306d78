use rust_decimal::Decimal;
use vodca::{AsRefln, Fromln};

/// Average review score, `0.00..=5.00`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Fromln, AsRefln)]
pub struct BookRating(Decimal);

impl BookRating {
    pub fn new(rating: impl Into<Decimal>) -> Self {
        Self(rating.into())
    }
}

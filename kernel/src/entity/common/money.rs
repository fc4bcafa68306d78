use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::Quantity;

/// Currency amount. Arithmetic is exact; [`Money::round`] brings a value back to
/// two decimal places.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Fromln,
    AsRefln,
)]
pub struct Money(Decimal);

impl Money {
    pub const SCALE: u32 = 2;

    pub fn new(amount: impl Into<Decimal>) -> Self {
        Self(amount.into())
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn times(&self, quantity: &Quantity) -> Self {
        Self(self.0 * Decimal::from(*quantity.as_ref()))
    }

    pub fn percent(&self, rate: &Decimal) -> Self {
        Self(self.0 * rate).round()
    }

    pub fn round(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use crate::entity::{Money, Quantity};

    #[test]
    fn times_multiplies_by_quantity() {
        let price = Money::new(dec!(25.00));
        assert_eq!(price.times(&Quantity::new(2)), Money::new(dec!(50.00)));
    }

    #[test]
    fn percent_rounds_half_away_from_zero() {
        let amount = Money::new(dec!(0.25));
        assert_eq!(amount.percent(&dec!(0.18)), Money::new(dec!(0.05)));
        let amount = Money::new(dec!(10.25));
        assert_eq!(amount.percent(&dec!(0.18)), Money::new(dec!(1.85)));
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        let total: Money = Vec::<Money>::new().into_iter().sum();
        assert_eq!(total, Money::zero());
    }
}

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

/// Human-readable order reference, `ORD-<unix millis>-<6 chars>`.
///
/// Uniqueness is enforced by storage; a colliding number is regenerated.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderNumber(String);

impl OrderNumber {
    const SUFFIX_LEN: usize = 6;

    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn generate<R: Rng + ?Sized>(now: OffsetDateTime, rng: &mut R) -> Self {
        let millis = now.unix_timestamp_nanos() / 1_000_000;
        let suffix = rng
            .sample_iter(&Alphanumeric)
            .take(Self::SUFFIX_LEN)
            .map(|c| char::from(c).to_ascii_uppercase())
            .collect::<String>();
        Self(format!("ORD-{millis}-{suffix}"))
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use time::macros::datetime;

    use super::OrderNumber;

    #[test]
    fn generated_number_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let number = OrderNumber::generate(datetime!(2024-03-01 12:00 UTC), &mut rng);
        let number: String = number.into();

        let parts = number.split('-').collect::<Vec<_>>();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1], "1709294400000");
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn consecutive_numbers_differ() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = datetime!(2024-03-01 12:00 UTC);
        assert_ne!(
            OrderNumber::generate(now, &mut rng),
            OrderNumber::generate(now, &mut rng)
        );
    }
}

use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectLimit(i32);

impl SelectLimit {
    pub const MAX: i32 = 100;

    /// Values outside `1..=MAX` are clamped.
    pub fn new(value: impl Into<i32>) -> Self {
        SelectLimit(value.into().clamp(1, Self::MAX))
    }
}

impl Default for SelectLimit {
    fn default() -> Self {
        Self::new(20)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectOffset(i32);

impl SelectOffset {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectOffset(value.into().max(0))
    }

    /// Offset of a 1-based page.
    pub fn from_page(page: i32, limit: &SelectLimit) -> Self {
        Self::new((page.max(1) - 1).saturating_mul(limit.0))
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{SelectLimit, SelectOffset};

    #[test]
    fn limit_is_clamped() {
        assert_eq!(SelectLimit::new(0), SelectLimit::new(1));
        assert_eq!(SelectLimit::new(500), SelectLimit::new(SelectLimit::MAX));
    }

    #[test]
    fn offset_from_page() {
        let limit = SelectLimit::new(12);
        assert_eq!(SelectOffset::from_page(1, &limit), SelectOffset::new(0));
        assert_eq!(SelectOffset::from_page(3, &limit), SelectOffset::new(24));
        assert_eq!(SelectOffset::from_page(-4, &limit), SelectOffset::new(0));
    }
}

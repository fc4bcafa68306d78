use crate::entity::{OrderStatus, SelectLimit, SelectOffset};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::Quantity;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookStock(i32);

impl BookStock {
    pub fn new(stock: impl Into<i32>) -> Self {
        Self(stock.into())
    }

    pub fn covers(&self, quantity: &Quantity) -> bool {
        self.0 >= *quantity.as_ref()
    }
}

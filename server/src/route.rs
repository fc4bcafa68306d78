mod book;
mod cart;
mod health;
mod order;

pub use self::{book::*, cart::*, health::*, order::*};

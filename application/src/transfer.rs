mod book;
mod cart;
mod order;

pub use self::{book::*, cart::*, order::*};

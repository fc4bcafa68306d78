mod auth;
mod book;
mod cart;
mod order;

pub use self::{auth::*, book::*, cart::*, order::*};

mod book;
mod cart;
mod catalog;
mod common;
mod order;
mod user;

pub use self::{book::*, cart::*, catalog::*, common::*, order::*, user::*};

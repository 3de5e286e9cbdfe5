//! Data models for users and books.

pub mod book;
pub mod user;

pub use book::*;
pub use user::*;

//! HTTP request handlers.

pub mod books;
pub mod extract;
pub mod http;

//! Authentication: register, login, bearer tokens, password hashing.

mod handlers;
mod jwt;
mod service;

pub use handlers::{login, register, LoginRequest, LoginResponse, RegisterRequest};
pub use jwt::{Claims, JwtKeys};
pub use service::PasswordService;

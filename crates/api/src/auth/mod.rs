//! Authentication: JWT tokens, password hashing, and cookie helpers.

pub mod cookie;
pub mod jwt;
pub mod password;

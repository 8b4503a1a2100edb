pub mod auth;
pub mod order;
pub mod pagination;
pub mod user;

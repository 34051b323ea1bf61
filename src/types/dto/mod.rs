pub mod admin;
pub mod auth;
pub mod event;
pub mod payment;
pub mod user;

// Internal types shared between stores and services
pub mod audit;
pub mod role;

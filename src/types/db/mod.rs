// Database entities (SeaORM models)
pub mod payment;
pub mod role;
pub mod security_event;
pub mod user;
pub mod user_role;

// Services layer - Business logic and orchestration
pub mod account_service;
pub mod auth_service;
pub mod hasher;
pub mod password_policy;
pub mod payment_service;
pub mod role_service;
pub mod security_events;

pub use account_service::AccountService;
pub use auth_service::AuthService;
pub use password_policy::PasswordPolicy;
pub use payment_service::{NewPayment, PaymentDetails, PaymentService};
pub use role_service::RoleService;
pub use security_events::SecurityEventsService;

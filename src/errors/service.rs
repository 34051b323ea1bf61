use thiserror::Error;

/// Core error taxonomy for the account, role, lockout and payroll
/// engines.
///
/// Business-rule violations are raised at the point of detection and
/// propagate unhandled to the API layer, which maps each kind to a
/// response status. `InvalidUserAction` carries an optional not-found
/// override for the cases where the action fails because the target
/// user is missing.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{message}")]
    UserNotFound { message: String },

    #[error("User exist!")]
    UserExists,

    #[error("The password is in the hacker's database!")]
    BreachedPassword,

    #[error("The passwords must be different!")]
    MatchingPassword,

    #[error("{message}")]
    InvalidRole { message: String },

    #[error("Role not found!")]
    RoleNotFound,

    #[error("{message}")]
    InvalidUserAction { message: String, not_found: bool },

    #[error("User account is locked")]
    LockedAccount,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Access Denied!")]
    AccessDenied,

    #[error("{message}")]
    InvalidPayment { message: String },

    #[error("Payment does not exist!")]
    PaymentDoesNotExist,

    /// Database query or transaction failure, tagged with the store
    /// operation that failed.
    #[error("Database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Password hashing or verification failure.
    #[error("Hash error: {operation} failed: {message}")]
    Hash { operation: String, message: String },
}

impl ServiceError {
    pub fn user_not_found() -> Self {
        Self::UserNotFound {
            message: "User not found!".to_string(),
        }
    }

    pub fn invalid_role(message: impl Into<String>) -> Self {
        Self::InvalidRole {
            message: message.into(),
        }
    }

    pub fn invalid_user_action(message: impl Into<String>) -> Self {
        Self::InvalidUserAction {
            message: message.into(),
            not_found: false,
        }
    }

    /// An invalid action whose root cause is a missing target, reported
    /// as not-found instead of bad-request.
    pub fn invalid_user_action_not_found(message: impl Into<String>) -> Self {
        Self::InvalidUserAction {
            message: message.into(),
            not_found: true,
        }
    }

    pub fn invalid_payment(message: impl Into<String>) -> Self {
        Self::InvalidPayment {
            message: message.into(),
        }
    }

    pub fn database(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    pub fn hash(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hash {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

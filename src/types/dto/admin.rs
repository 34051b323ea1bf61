use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for granting or removing a role
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleUpdateRequest {
    /// Email of the target account
    pub user: String,

    /// Role short name, e.g. "ACCOUNTANT"
    pub role: String,

    /// "GRANT", "REMOVE", or a comma-joined sequence of both
    pub operation: String,
}

/// Request model for locking or unlocking an account
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Email of the target account
    pub user: String,

    /// "LOCK" or "UNLOCK", case-insensitive
    pub operation: String,
}

/// Response model for account deletion
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// Email of the deleted account
    pub user: String,

    /// Outcome description
    pub status: String,
}

/// Response model carrying a single status line
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Outcome description
    pub status: String,
}

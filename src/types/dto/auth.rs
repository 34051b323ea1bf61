use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for account registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Given name
    #[oai(validator(min_length = 1))]
    pub name: String,

    /// Family name
    #[oai(validator(min_length = 1))]
    pub lastname: String,

    /// Corporate email address, doubles as the username
    #[oai(validator(pattern = r"^[a-zA-Z0-9_\.]+@acme\.com$"))]
    pub email: String,

    /// Password, at least 12 characters
    #[oai(validator(min_length = 12))]
    pub password: String,
}

/// Request model for password change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// New password to set, at least 12 characters
    #[oai(validator(min_length = 12))]
    pub new_password: String,
}

/// Response model for password change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordResponse {
    /// Email of the account whose password changed
    pub email: String,

    /// Outcome description
    pub status: String,
}

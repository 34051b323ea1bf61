use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::stores::UserRecord;

/// Public view of an account. Roles are canonical names in
/// alphabetical order.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// Database identifier
    pub id: i64,

    /// Given name
    pub name: String,

    /// Family name
    pub lastname: String,

    /// Corporate email address
    pub email: String,

    /// Canonical role names, alphabetically sorted
    pub roles: Vec<String>,
}

impl From<&UserRecord> for UserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.user.id,
            name: record.user.name.clone(),
            lastname: record.user.last_name.clone(),
            email: record.user.username.clone(),
            roles: record.role_names(),
        }
    }
}

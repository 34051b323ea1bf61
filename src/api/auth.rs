use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{AccessGuard, BasicAuthorization, AUTH_CHANGE_PASS, AUTH_SIGNUP};
use crate::errors::ApiError;
use crate::services::AccountService;
use crate::types::dto::auth::{ChangePasswordRequest, ChangePasswordResponse, SignupRequest};
use crate::types::dto::user::UserResponse;
use crate::types::internal::role::UserRole;

/// Registration and password management endpoints
pub struct AuthApi {
    accounts: Arc<AccountService>,
    guard: Arc<AccessGuard>,
}

impl AuthApi {
    pub fn new(accounts: Arc<AccountService>, guard: Arc<AccessGuard>) -> Self {
        Self { accounts, guard }
    }
}

#[derive(Tags)]
enum AuthTags {
    /// Account registration and password management
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account; the first account becomes the administrator
    #[oai(path = "/signup", method = "post", tag = "AuthTags::Authentication")]
    async fn signup(&self, body: Json<SignupRequest>) -> Result<Json<UserResponse>, ApiError> {
        let record = self
            .accounts
            .register(&body.name, &body.lastname, &body.email, &body.password)
            .await
            .map_err(|e| ApiError::from_service(e, AUTH_SIGNUP))?;
        Ok(Json(UserResponse::from(&record)))
    }

    /// Change the caller's password
    #[oai(path = "/changepass", method = "post", tag = "AuthTags::Authentication")]
    async fn change_password(
        &self,
        auth: BasicAuthorization,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<ChangePasswordResponse>, ApiError> {
        // Any authenticated account may change its own password
        let record = self
            .guard
            .authorize(&auth.0, AUTH_CHANGE_PASS, &UserRole::CATALOG)
            .await?;

        self.accounts
            .change_password(&record.user.username, &body.new_password)
            .await
            .map_err(|e| ApiError::from_service(e, AUTH_CHANGE_PASS))?;

        Ok(Json(ChangePasswordResponse {
            email: record.user.username.clone(),
            status: "The password has been updated successfully".to_string(),
        }))
    }
}

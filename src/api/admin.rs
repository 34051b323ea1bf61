use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{
    AccessGuard, BasicAuthorization, ADMIN_USER, ADMIN_USER_ACCESS, ADMIN_USER_DELETE,
    ADMIN_USER_ROLE,
};
use crate::errors::ApiError;
use crate::services::{AccountService, AuthService};
use crate::types::dto::admin::{AccessRequest, DeleteUserResponse, RoleUpdateRequest, StatusResponse};
use crate::types::dto::user::UserResponse;
use crate::types::internal::role::{AccessAction, UserRole};

const ADMINISTRATOR_ONLY: &[UserRole] = &[UserRole::Administrator];

/// Administrator endpoints for user and access management
pub struct AdminApi {
    accounts: Arc<AccountService>,
    auth_service: Arc<AuthService>,
    guard: Arc<AccessGuard>,
}

impl AdminApi {
    pub fn new(
        accounts: Arc<AccountService>,
        auth_service: Arc<AuthService>,
        guard: Arc<AccessGuard>,
    ) -> Self {
        Self {
            accounts,
            auth_service,
            guard,
        }
    }
}

#[derive(Tags)]
enum AdminTags {
    /// User administration
    Administration,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Grant or remove a role
    #[oai(path = "/user/role", method = "put", tag = "AdminTags::Administration")]
    async fn update_role(
        &self,
        auth: BasicAuthorization,
        body: Json<RoleUpdateRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let actor = self
            .guard
            .authorize(&auth.0, ADMIN_USER_ROLE, ADMINISTRATOR_ONLY)
            .await?;

        let record = self
            .accounts
            .update_user_roles(&body.user, &body.role, &body.operation, &actor.user.username)
            .await
            .map_err(|e| ApiError::from_service(e, ADMIN_USER_ROLE))?;
        Ok(Json(UserResponse::from(&record)))
    }

    /// List all accounts in registration order
    #[oai(path = "/user/", method = "get", tag = "AdminTags::Administration")]
    async fn list_users(
        &self,
        auth: BasicAuthorization,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.guard
            .authorize(&auth.0, ADMIN_USER, ADMINISTRATOR_ONLY)
            .await?;

        let users = self
            .accounts
            .find_all_users()
            .await
            .map_err(|e| ApiError::from_service(e, ADMIN_USER))?;
        Ok(Json(users.iter().map(UserResponse::from).collect()))
    }

    /// Lock or unlock an account
    #[oai(path = "/user/access", method = "put", tag = "AdminTags::Administration")]
    async fn update_access(
        &self,
        auth: BasicAuthorization,
        body: Json<AccessRequest>,
    ) -> Result<Json<StatusResponse>, ApiError> {
        let actor = self
            .guard
            .authorize(&auth.0, ADMIN_USER_ACCESS, ADMINISTRATOR_ONLY)
            .await?;

        let action = self
            .auth_service
            .lock_and_unlock(
                &body.operation,
                &body.user,
                &actor.user.username,
                ADMIN_USER_ACCESS,
            )
            .await
            .map_err(|e| ApiError::from_service(e, ADMIN_USER_ACCESS))?;

        let state = match action {
            AccessAction::Lock => "locked",
            AccessAction::Unlock => "unlocked",
        };
        Ok(Json(StatusResponse {
            status: format!("User {} {}!", body.user.to_lowercase(), state),
        }))
    }

    /// Delete an account
    #[oai(path = "/user/:email", method = "delete", tag = "AdminTags::Administration")]
    async fn delete_user(
        &self,
        auth: BasicAuthorization,
        email: Path<String>,
    ) -> Result<Json<DeleteUserResponse>, ApiError> {
        let actor = self
            .guard
            .authorize(&auth.0, ADMIN_USER_DELETE, ADMINISTRATOR_ONLY)
            .await?;

        self.accounts
            .delete_user(&email.0, &actor.user.username)
            .await
            .map_err(|e| ApiError::from_service(e, ADMIN_USER_DELETE))?;
        Ok(Json(DeleteUserResponse {
            user: email.0.to_lowercase(),
            status: "Deleted successfully!".to_string(),
        }))
    }
}

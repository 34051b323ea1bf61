// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod events;
pub mod payment;

use std::sync::Arc;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use events::EventsApi;
pub use payment::PaymentApi;
use poem_openapi::auth::Basic;
use poem_openapi::SecurityScheme;

use crate::errors::{ApiError, ServiceError};
use crate::services::{AuthService, SecurityEventsService};
use crate::stores::UserRecord;
use crate::types::internal::role::UserRole;

// Canonical request paths, as recorded in the audit trail.
pub const AUTH_SIGNUP: &str = "/api/auth/signup";
pub const AUTH_CHANGE_PASS: &str = "/api/auth/changepass";
pub const ADMIN_USER_ROLE: &str = "/api/admin/user/role";
pub const ADMIN_USER: &str = "/api/admin/user/";
pub const ADMIN_USER_ACCESS: &str = "/api/admin/user/access";
pub const ADMIN_USER_DELETE: &str = "/api/admin/user";
pub const EMPL_PAYMENT: &str = "/api/empl/payment";
pub const ACCT_PAYMENTS: &str = "/api/acct/payments";
pub const SECURITY_EVENTS: &str = "/api/security/events/";

/// HTTP Basic authentication
#[derive(SecurityScheme)]
#[oai(ty = "basic")]
pub struct BasicAuthorization(pub Basic);

/// Per-request authentication and role check shared by all guarded
/// endpoints. A failed role check records an `ACCESS_DENIED` event.
pub struct AccessGuard {
    auth_service: Arc<AuthService>,
    events: Arc<SecurityEventsService>,
}

impl AccessGuard {
    pub fn new(auth_service: Arc<AuthService>, events: Arc<SecurityEventsService>) -> Self {
        Self {
            auth_service,
            events,
        }
    }

    /// Authenticates the Basic credentials and requires one of
    /// `allowed`. Credential failures never disclose whether the
    /// account exists.
    pub async fn authorize(
        &self,
        auth: &Basic,
        path: &str,
        allowed: &[UserRole],
    ) -> Result<UserRecord, ApiError> {
        let record = self
            .auth_service
            .authenticate(&auth.username, &auth.password, path)
            .await
            .map_err(|err| match err {
                ServiceError::UserNotFound { .. } | ServiceError::InvalidCredentials => {
                    ApiError::unauthorized("Invalid username or password", path)
                }
                other => ApiError::from_service(other, path),
            })?;

        if !allowed
            .iter()
            .any(|role| record.holds_role(role.canonical()))
        {
            self.events
                .record(SecurityEventsService::access_denied_event(
                    &record.user.username,
                    path,
                ))
                .await
                .map_err(|e| ApiError::from_service(e, path))?;
            return Err(ApiError::from_service(ServiceError::AccessDenied, path));
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AccountService, PasswordPolicy};
    use crate::stores::AuditStore;
    use crate::stores::CredentialStore;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (AccessGuard, Arc<SecurityEventsService>, AccountService) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credential_store = Arc::new(CredentialStore::new(db.clone()));
        credential_store.seed_roles().await;
        let events = Arc::new(SecurityEventsService::new(Arc::new(AuditStore::new(
            db.clone(),
        ))));
        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            credential_store.clone(),
            events.clone(),
        ));
        let accounts = AccountService::new(
            db,
            credential_store,
            events.clone(),
            PasswordPolicy::new(),
        );

        let guard = AccessGuard::new(auth_service, events.clone());
        (guard, events, accounts)
    }

    fn basic(username: &str, password: &str) -> Basic {
        Basic {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn missing_role_records_access_denied_and_forbids() {
        let (guard, events, accounts) = setup().await;
        accounts
            .register("Admin", "Root", "admin@acme.com", "longEnoughPw1!")
            .await
            .unwrap();
        accounts
            .register("John", "Doe", "john@acme.com", "longEnoughPw1!")
            .await
            .unwrap();

        let err = guard
            .authorize(
                &basic("john@acme.com", "longEnoughPw1!"),
                SECURITY_EVENTS,
                &[UserRole::Auditor],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let denied: Vec<_> = events
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.action == "ACCESS_DENIED")
            .collect();
        assert_eq!(denied.len(), 1);
        assert_eq!(denied[0].subject, "john@acme.com");
        assert_eq!(denied[0].object, SECURITY_EVENTS);
        assert_eq!(denied[0].path, SECURITY_EVENTS);
    }

    #[tokio::test]
    async fn matching_role_passes_without_event() {
        let (guard, events, accounts) = setup().await;
        accounts
            .register("Admin", "Root", "admin@acme.com", "longEnoughPw1!")
            .await
            .unwrap();

        let record = guard
            .authorize(
                &basic("admin@acme.com", "longEnoughPw1!"),
                ADMIN_USER,
                &[UserRole::Administrator],
            )
            .await
            .expect("authorization failed");
        assert_eq!(record.user.username, "admin@acme.com");

        let denied = events
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.action == "ACCESS_DENIED")
            .count();
        assert_eq!(denied, 0);
    }

    #[tokio::test]
    async fn bad_credentials_stay_unauthorized_not_forbidden() {
        let (guard, _events, accounts) = setup().await;
        accounts
            .register("Admin", "Root", "admin@acme.com", "longEnoughPw1!")
            .await
            .unwrap();

        let err = guard
            .authorize(
                &basic("admin@acme.com", "wrongPassword!"),
                ADMIN_USER,
                &[UserRole::Administrator],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = guard
            .authorize(
                &basic("ghost@acme.com", "whatever12345"),
                ADMIN_USER,
                &[UserRole::Administrator],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}

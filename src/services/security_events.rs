use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::api::{ADMIN_USER_DELETE, ADMIN_USER_ROLE, AUTH_CHANGE_PASS, AUTH_SIGNUP};
use crate::errors::ServiceError;
use crate::stores::AuditStore;
use crate::types::db::security_event;
use crate::types::internal::audit::{AuditEvent, EventKind};

/// Records security-relevant actions in the audit trail and builds the
/// canonical event texts.
pub struct SecurityEventsService {
    audit_store: Arc<AuditStore>,
}

impl SecurityEventsService {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    pub async fn record(&self, event: AuditEvent) -> Result<(), ServiceError> {
        self.audit_store.append(event).await
    }

    /// Records a batch on the given connection so the caller can commit
    /// the events together with the mutation they describe.
    pub async fn record_all_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        events: Vec<AuditEvent>,
    ) -> Result<(), ServiceError> {
        self.audit_store.append_all_with(conn, events).await
    }

    pub async fn record_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        event: AuditEvent,
    ) -> Result<(), ServiceError> {
        self.audit_store.append_with(conn, event).await
    }

    pub async fn find_all(&self) -> Result<Vec<security_event::Model>, ServiceError> {
        self.audit_store.find_all().await
    }

    // Event constructors. Subjects are lower-cased by `AuditEvent::new`.

    pub fn create_user_event(object: &str) -> AuditEvent {
        AuditEvent::new(
            EventKind::CreateUser,
            "Anonymous",
            object.to_lowercase(),
            AUTH_SIGNUP,
        )
    }

    pub fn change_password_event(subject: &str) -> AuditEvent {
        AuditEvent::new(
            EventKind::ChangePassword,
            subject,
            subject.to_lowercase(),
            AUTH_CHANGE_PASS,
        )
    }

    pub fn delete_user_event(subject: &str, object: &str) -> AuditEvent {
        AuditEvent::new(
            EventKind::DeleteUser,
            subject,
            object.to_lowercase(),
            ADMIN_USER_DELETE,
        )
    }

    pub fn grant_role_event(subject: &str, role: &str, object: &str) -> AuditEvent {
        AuditEvent::new(
            EventKind::GrantRole,
            subject,
            format!(
                "Grant role {} to {}",
                role.to_uppercase(),
                object.to_lowercase()
            ),
            ADMIN_USER_ROLE,
        )
    }

    pub fn remove_role_event(subject: &str, role: &str, object: &str) -> AuditEvent {
        AuditEvent::new(
            EventKind::RemoveRole,
            subject,
            format!(
                "Remove role {} from {}",
                role.to_uppercase(),
                object.to_lowercase()
            ),
            ADMIN_USER_ROLE,
        )
    }

    pub fn lock_user_event(subject: &str, object: &str, path: &str) -> AuditEvent {
        AuditEvent::new(
            EventKind::LockUser,
            subject,
            format!("Lock user {}", object.to_lowercase()),
            path,
        )
    }

    pub fn unlock_user_event(subject: &str, object: &str, path: &str) -> AuditEvent {
        AuditEvent::new(
            EventKind::UnlockUser,
            subject,
            format!("Unlock user {}", object.to_lowercase()),
            path,
        )
    }

    pub fn login_failed_event(username: &str, path: &str) -> AuditEvent {
        AuditEvent::new(EventKind::LoginFailed, username, path, path)
    }

    pub fn brute_force_event(username: &str, path: &str) -> AuditEvent {
        AuditEvent::new(EventKind::BruteForce, username, path, path)
    }

    pub fn access_denied_event(subject: &str, path: &str) -> AuditEvent {
        AuditEvent::new(EventKind::AccessDenied, subject, path, path)
    }
}

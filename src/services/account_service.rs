use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::errors::ServiceError;
use crate::services::{hasher, PasswordPolicy, RoleService, SecurityEventsService};
use crate::stores::{CredentialStore, UserRecord};
use crate::types::internal::role::UserRole;

/// Account lifecycle engine: registration, password changes, role
/// updates and deletion. Every mutation records its audit events;
/// role updates commit their row changes and events atomically.
pub struct AccountService {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    events: Arc<SecurityEventsService>,
    policy: PasswordPolicy,
    roles: RoleService,
}

impl AccountService {
    pub fn new(
        db: DatabaseConnection,
        credential_store: Arc<CredentialStore>,
        events: Arc<SecurityEventsService>,
        policy: PasswordPolicy,
    ) -> Self {
        let roles = RoleService::new(credential_store.clone());
        Self {
            db,
            credential_store,
            events,
            policy,
            roles,
        }
    }

    /// Registers a new account. The very first account becomes the
    /// administrator; every later one starts as a plain user. The
    /// breached-password check runs before the duplicate check, so a
    /// breached password is reported even for a taken username.
    pub async fn register(
        &self,
        name: &str,
        lastname: &str,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, ServiceError> {
        self.policy.validate_new_password(password)?;

        let existing_users = self.credential_store.find_all().await?;
        if !existing_users.is_empty()
            && self
                .credential_store
                .find_by_username(username)
                .await?
                .is_some()
        {
            return Err(ServiceError::UserExists);
        }

        let initial_role = if existing_users.is_empty() {
            UserRole::Administrator
        } else {
            UserRole::User
        };
        let role = self
            .credential_store
            .find_role_by_name(initial_role.canonical())
            .await?
            .ok_or(ServiceError::RoleNotFound)?;

        let hash = hasher::hash_password(password)?;
        // Stored lower-cased so the unique column enforces the
        // case-insensitive username rule
        let record = self
            .credential_store
            .insert_user(name, lastname, &username.to_lowercase(), &hash, role.id)
            .await?;

        tracing::info!(
            "registered user {} with role {}",
            record.user.username,
            initial_role.canonical()
        );
        self.events
            .record(SecurityEventsService::create_user_event(
                &record.user.username,
            ))
            .await?;

        Ok(record)
    }

    /// Replaces the caller's password. The new password must clear the
    /// breached list and differ from the current one.
    pub async fn change_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let record = self
            .credential_store
            .find_by_username(username)
            .await?
            .ok_or_else(ServiceError::user_not_found)?;

        self.policy
            .reject_unchanged(new_password, &record.user.password_hash)?;
        self.policy.validate_new_password(new_password)?;

        let hash = hasher::hash_password(new_password)?;
        self.credential_store
            .set_password_hash(record.user.id, &hash)
            .await?;

        tracing::info!("password updated for user {}", record.user.username);
        self.events
            .record(SecurityEventsService::change_password_event(
                &record.user.username,
            ))
            .await?;

        Ok(())
    }

    /// Deletes an account on behalf of `actor`. An administrator
    /// deleting their own account is refused, since that would strip
    /// the administrator role.
    pub async fn delete_user(&self, username: &str, actor: &str) -> Result<(), ServiceError> {
        let record = self
            .credential_store
            .find_by_username(username)
            .await?
            .ok_or_else(ServiceError::user_not_found)?;

        if record.is_administrator() && actor.eq_ignore_ascii_case(username) {
            return Err(ServiceError::invalid_user_action(
                "Can't remove ADMINISTRATOR role!",
            ));
        }

        self.credential_store.delete_user(record.user.id).await?;
        tracing::info!("deleted user {}", record.user.username);
        self.events
            .record(SecurityEventsService::delete_user_event(
                actor,
                &record.user.username,
            ))
            .await?;

        Ok(())
    }

    /// Applies a grant/remove operation spec (single keyword or a
    /// comma-joined sequence) to `username`'s role set. Row changes
    /// and the per-operation audit events commit in one transaction.
    pub async fn update_user_roles(
        &self,
        username: &str,
        role_short: &str,
        operation_spec: &str,
        actor: &str,
    ) -> Result<UserRecord, ServiceError> {
        // Malformed operation keywords are reported before the user lookup
        RoleService::parse_operations(operation_spec)?;

        let record = self
            .credential_store
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::invalid_user_action_not_found("User not found!"))?;

        let (new_roles, audit_events) = self
            .roles
            .apply_operations(&record, role_short, operation_spec, actor)
            .await?;

        let role_ids: Vec<i64> = new_roles.iter().map(|r| r.id).collect();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::database("update_user_roles.begin", e))?;
        self.credential_store
            .replace_roles(&txn, record.user.id, &role_ids)
            .await?;
        self.events.record_all_with(&txn, audit_events).await?;
        txn.commit()
            .await
            .map_err(|e| ServiceError::database("update_user_roles.commit", e))?;

        self.credential_store
            .find_by_username(username)
            .await?
            .ok_or_else(ServiceError::user_not_found)
    }

    /// All accounts in registration order.
    pub async fn find_all_users(&self) -> Result<Vec<UserRecord>, ServiceError> {
        self.credential_store.find_all().await
    }
}

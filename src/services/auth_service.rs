use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::errors::ServiceError;
use crate::services::{hasher, SecurityEventsService};
use crate::stores::{CredentialStore, UserRecord};
use crate::types::internal::role::AccessAction;

/// Consecutive failures after which a non-administrator account locks.
const MAX_LOGIN_ATTEMPTS: i32 = 5;

/// Authentication and lockout engine.
///
/// Tracks failed attempts per user, triggers the automatic lockout and
/// handles the explicit administrator lock/unlock actions. All state
/// lives in the credential store; this service is a stateless
/// transformer invoked from the request layer.
pub struct AuthService {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    events: Arc<SecurityEventsService>,
}

impl AuthService {
    pub fn new(
        db: DatabaseConnection,
        credential_store: Arc<CredentialStore>,
        events: Arc<SecurityEventsService>,
    ) -> Self {
        Self {
            db,
            credential_store,
            events,
        }
    }

    /// Evaluates credentials for the request at `path`.
    ///
    /// An unknown username records `LOGIN_FAILED` and fails with
    /// `UserNotFound`; beyond that log entry, failures never disclose
    /// whether the account exists. A wrong password routes through the
    /// failed-login tracking and may escalate into a lockout.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        path: &str,
    ) -> Result<UserRecord, ServiceError> {
        let record = match self.credential_store.find_by_username(username).await? {
            Some(record) => record,
            None => {
                tracing::error!("authentication attempt for unknown user {}", username);
                self.events
                    .record(SecurityEventsService::login_failed_event(username, path))
                    .await?;
                return Err(ServiceError::user_not_found());
            }
        };

        if record.user.locked {
            return Err(ServiceError::LockedAccount);
        }

        if !hasher::verify_password(password, &record.user.password_hash)? {
            self.handle_failed_login(username, path).await?;
            return Err(ServiceError::InvalidCredentials);
        }

        self.reset_failed_login_attempts(&record).await?;
        Ok(record)
    }

    /// Increments the failed-attempt counter and locks the account on
    /// the fifth consecutive failure. Administrators are exempt from
    /// the automatic lock regardless of attempt count.
    pub async fn handle_failed_login(&self, username: &str, path: &str) -> Result<(), ServiceError> {
        let record = match self.credential_store.find_by_username(username).await? {
            Some(record) => record,
            None => return Ok(()),
        };

        let attempts = record.user.failed_attempts + 1;
        tracing::debug!("failed attempts for user {} now {}", username, attempts);

        self.credential_store
            .set_failed_attempts(&self.db, record.user.id, attempts)
            .await?;
        self.events
            .record(SecurityEventsService::login_failed_event(username, path))
            .await?;

        if attempts >= MAX_LOGIN_ATTEMPTS && !record.is_administrator() {
            tracing::error!("user {} is locked after too many failed attempts", username);

            // Lock flag and both events commit together
            let txn = self
                .db
                .begin()
                .await
                .map_err(|e| ServiceError::database("lockout.begin", e))?;
            self.events
                .record_with(&txn, SecurityEventsService::brute_force_event(username, path))
                .await?;
            self.credential_store
                .set_locked(&txn, record.user.id, true)
                .await?;
            self.events
                .record_with(
                    &txn,
                    SecurityEventsService::lock_user_event(username, username, path),
                )
                .await?;
            txn.commit()
                .await
                .map_err(|e| ServiceError::database("lockout.commit", e))?;

            return Err(ServiceError::LockedAccount);
        }

        Ok(())
    }

    /// Zeroes the failed-attempt counter after a successful
    /// authentication. The reset itself is not audited.
    pub async fn reset_failed_login_attempts(
        &self,
        record: &UserRecord,
    ) -> Result<(), ServiceError> {
        if record.user.failed_attempts > 0 {
            self.credential_store
                .set_failed_attempts(&self.db, record.user.id, 0)
                .await?;
        }
        Ok(())
    }

    /// Explicit administrator lock/unlock, outside the automatic
    /// counter. The lock-state change and its event commit in one
    /// transaction.
    pub async fn lock_and_unlock(
        &self,
        action: &str,
        username: &str,
        actor: &str,
        path: &str,
    ) -> Result<AccessAction, ServiceError> {
        let action = AccessAction::parse(action)?;

        let record = self
            .credential_store
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::invalid_user_action_not_found("User not found!"))?;

        if action == AccessAction::Lock && record.is_administrator() {
            tracing::error!("refusing to lock administrator {}", username);
            return Err(ServiceError::invalid_user_action(format!(
                "Can't {} the ADMINISTRATOR!",
                action.as_str()
            )));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::database("lock_and_unlock.begin", e))?;

        match action {
            AccessAction::Lock => {
                self.credential_store
                    .set_locked(&txn, record.user.id, true)
                    .await?;
                self.events
                    .record_with(
                        &txn,
                        SecurityEventsService::lock_user_event(actor, username, path),
                    )
                    .await?;
            }
            AccessAction::Unlock => {
                self.credential_store
                    .set_locked(&txn, record.user.id, false)
                    .await?;
                self.credential_store
                    .set_failed_attempts(&txn, record.user.id, 0)
                    .await?;
                self.events
                    .record_with(
                        &txn,
                        SecurityEventsService::unlock_user_event(actor, username, path),
                    )
                    .await?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| ServiceError::database("lock_and_unlock.commit", e))?;

        tracing::info!(
            "updated user {} lock state to {}",
            username,
            action == AccessAction::Lock
        );
        Ok(action)
    }
}

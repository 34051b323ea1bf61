use std::sync::Arc;

use crate::errors::ServiceError;
use crate::services::SecurityEventsService;
use crate::stores::{CredentialStore, UserRecord};
use crate::types::db::role;
use crate::types::internal::audit::AuditEvent;
use crate::types::internal::role::{RoleAction, UserRole};

/// Role management engine: enforces the role-assignment invariants and
/// turns an operation spec into a new role set plus its audit events.
///
/// The engine is a stateless transformer over a store-fetched snapshot;
/// the caller persists the result.
pub struct RoleService {
    credential_store: Arc<CredentialStore>,
}

impl RoleService {
    pub fn new(credential_store: Arc<CredentialStore>) -> Self {
        Self { credential_store }
    }

    /// Parses an operation spec: a single keyword, or a comma-joined
    /// combination applied sequentially against the same role. Any
    /// unrecognized keyword fails the whole request before any mutation.
    pub fn parse_operations(spec: &str) -> Result<Vec<RoleAction>, ServiceError> {
        if spec.is_empty() {
            return Err(ServiceError::invalid_user_action(
                "A role operation must be provided!",
            ));
        }
        spec.split(',').map(RoleAction::parse).collect()
    }

    /// A grant must keep the user purely administrative or purely
    /// business, and must not duplicate a held role.
    pub fn validate_grant(existing: &[role::Model], new_role: &str) -> Result<(), ServiceError> {
        let holds_administrator = existing
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(UserRole::Administrator.canonical()));
        let new_is_administrative =
            new_role.eq_ignore_ascii_case(UserRole::Administrator.canonical());

        if new_is_administrative != holds_administrator {
            return Err(ServiceError::invalid_role(
                "The user cannot combine administrative and business roles!",
            ));
        }

        if existing.iter().any(|r| r.name.eq_ignore_ascii_case(new_role)) {
            return Err(ServiceError::invalid_role(
                "Not possible to add duplicated role!",
            ));
        }

        Ok(())
    }

    /// The administrator role is never removable here, a removed role
    /// must be held, and a user always retains at least one role.
    pub fn validate_removal(existing: &[role::Model], role_name: &str) -> Result<(), ServiceError> {
        if role_name.eq_ignore_ascii_case(UserRole::Administrator.canonical())
            && existing
                .iter()
                .any(|r| r.name.eq_ignore_ascii_case(UserRole::Administrator.canonical()))
        {
            return Err(ServiceError::invalid_role("Can't remove ADMINISTRATOR role!"));
        }

        if !existing.iter().any(|r| r.name.eq_ignore_ascii_case(role_name)) {
            return Err(ServiceError::invalid_role("The user does not have a role!"));
        }

        if existing.len() == 1 {
            return Err(ServiceError::invalid_role(
                "The user must have at least one role!",
            ));
        }

        Ok(())
    }

    /// Exact canonical-name lookup in the catalog; a miss is a hard
    /// failure.
    pub async fn resolve_role(&self, canonical_name: &str) -> Result<role::Model, ServiceError> {
        self.credential_store
            .find_role_by_name(canonical_name)
            .await?
            .ok_or(ServiceError::RoleNotFound)
    }

    /// Applies the operation spec against a single role name, in the
    /// literal order given, and returns the resulting role set together
    /// with one audit event per successful grant/remove.
    ///
    /// A comma-joined spec (e.g. `GRANT,REMOVE`) is applied sequentially
    /// to the same role. The request surface only ever sends a single
    /// keyword; the combined form is kept for compatibility.
    pub async fn apply_operations(
        &self,
        record: &UserRecord,
        role_short: &str,
        operation_spec: &str,
        actor: &str,
    ) -> Result<(Vec<role::Model>, Vec<AuditEvent>), ServiceError> {
        let operations = Self::parse_operations(operation_spec)?;
        let canonical = format!("ROLE_{}", role_short);

        let mut roles = record.roles.clone();
        let mut events = Vec::new();

        for operation in operations {
            match operation {
                RoleAction::Grant => {
                    tracing::debug!(
                        "granting role {} to user {}",
                        canonical,
                        record.user.username
                    );
                    Self::validate_grant(&roles, &canonical)?;
                    let resolved = self.resolve_role(&canonical).await?;
                    roles.push(resolved);
                    events.push(SecurityEventsService::grant_role_event(
                        actor,
                        role_short,
                        &record.user.username,
                    ));
                }
                RoleAction::Remove => {
                    tracing::debug!(
                        "removing role {} from user {}",
                        canonical,
                        record.user.username
                    );
                    Self::validate_removal(&roles, &canonical)?;
                    roles.retain(|r| !r.name.eq_ignore_ascii_case(&canonical));
                    events.push(SecurityEventsService::remove_role_event(
                        actor,
                        role_short,
                        &record.user.username,
                    ));
                }
            }
        }

        Ok((roles, events))
    }
}

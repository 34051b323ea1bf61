use std::fmt;

use crate::errors::ServiceError;

/// Fixed role catalog. Roles are seeded once at startup and never
/// deleted at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Administrator,
    User,
    Accountant,
    Auditor,
}

/// A user either holds the single administrative role or one or more
/// business roles, never a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    Administrative,
    Business,
}

impl UserRole {
    pub const CATALOG: [UserRole; 4] = [
        UserRole::Administrator,
        UserRole::User,
        UserRole::Accountant,
        UserRole::Auditor,
    ];

    /// Canonical prefixed form stored in the roles table.
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Administrator => "ROLE_ADMINISTRATOR",
            Self::User => "ROLE_USER",
            Self::Accountant => "ROLE_ACCOUNTANT",
            Self::Auditor => "ROLE_AUDITOR",
        }
    }

    /// Short form used in request payloads and audit event text.
    pub fn short(&self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::User => "USER",
            Self::Accountant => "ACCOUNTANT",
            Self::Auditor => "AUDITOR",
        }
    }

    pub fn class(&self) -> RoleClass {
        match self {
            Self::Administrator => RoleClass::Administrative,
            _ => RoleClass::Business,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Recognized role-mutation keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    Grant,
    Remove,
}

impl RoleAction {
    /// Parses a single operation keyword, case-insensitive. Any other
    /// value is an invalid user action.
    pub fn parse(op: &str) -> Result<Self, ServiceError> {
        if op.eq_ignore_ascii_case("GRANT") {
            Ok(Self::Grant)
        } else if op.eq_ignore_ascii_case("REMOVE") {
            Ok(Self::Remove)
        } else {
            Err(ServiceError::invalid_user_action(
                "Invalid role operation(s) provided!",
            ))
        }
    }
}

/// Recognized explicit lock-state keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessAction {
    Lock,
    Unlock,
}

impl AccessAction {
    pub fn parse(action: &str) -> Result<Self, ServiceError> {
        if action.eq_ignore_ascii_case("lock") {
            Ok(Self::Lock)
        } else if action.eq_ignore_ascii_case("unlock") {
            Ok(Self::Unlock)
        } else {
            Err(ServiceError::invalid_user_action("Invalid user action!"))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Unlock => "unlock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_both_classes() {
        assert_eq!(UserRole::Administrator.class(), RoleClass::Administrative);
        for role in [UserRole::User, UserRole::Accountant, UserRole::Auditor] {
            assert_eq!(role.class(), RoleClass::Business);
        }
    }

    #[test]
    fn role_action_parsing_is_case_insensitive() {
        assert_eq!(RoleAction::parse("GRANT").unwrap(), RoleAction::Grant);
        assert_eq!(RoleAction::parse("remove").unwrap(), RoleAction::Remove);
        assert!(RoleAction::parse("PROMOTE").is_err());
    }

    #[test]
    fn access_action_rejects_unknown_keywords() {
        assert_eq!(AccessAction::parse("LOCK").unwrap(), AccessAction::Lock);
        assert_eq!(AccessAction::parse("Unlock").unwrap(), AccessAction::Unlock);
        assert!(AccessAction::parse("ban").is_err());
    }
}

use std::fmt;

/// Kinds of security-relevant actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CreateUser,
    ChangePassword,
    AccessDenied,
    LoginFailed,
    GrantRole,
    RemoveRole,
    LockUser,
    UnlockUser,
    DeleteUser,
    BruteForce,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateUser => "CREATE_USER",
            Self::ChangePassword => "CHANGE_PASSWORD",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::GrantRole => "GRANT_ROLE",
            Self::RemoveRole => "REMOVE_ROLE",
            Self::LockUser => "LOCK_USER",
            Self::UnlockUser => "UNLOCK_USER",
            Self::DeleteUser => "DELETE_USER",
            Self::BruteForce => "BRUTE_FORCE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CreateUser => "A user has been successfully registered",
            Self::ChangePassword => "A user has changed the password successfully",
            Self::AccessDenied => "A user is trying to access a resource without access rights",
            Self::LoginFailed => "Failed authentication",
            Self::GrantRole => "A role is granted to a user",
            Self::RemoveRole => "A role has been revoked",
            Self::LockUser => "The Administrator has locked the user",
            Self::UnlockUser => "The Administrator has unlocked a user",
            Self::DeleteUser => "The Administrator has deleted a user",
            Self::BruteForce => "A user has been blocked on suspicion of a brute force attack",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A security event not yet persisted. The creation date and row id are
/// assigned by the audit store on append.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: EventKind,
    pub subject: String,
    pub object: String,
    pub path: String,
}

impl AuditEvent {
    /// Subjects are acting principals and stored lower-cased.
    pub fn new(
        action: EventKind,
        subject: impl Into<String>,
        object: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            action,
            subject: subject.into().to_lowercase(),
            object: object.into(),
            path: path.into(),
        }
    }
}

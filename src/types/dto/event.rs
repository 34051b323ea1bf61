use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::security_event;

/// One security event as returned by the audit endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct EventResponse {
    /// Database identifier, ascending with time
    pub id: i64,

    /// Calendar date the event was recorded
    pub date: String,

    /// Event kind, e.g. "CREATE_USER"
    pub action: String,

    /// Email of the acting user, or "anonymous"
    pub subject: String,

    /// Target of the action
    pub object: String,

    /// API path the event originated from
    pub path: String,
}

impl From<security_event::Model> for EventResponse {
    fn from(event: security_event::Model) -> Self {
        Self {
            id: event.id,
            date: event.date,
            action: event.action,
            subject: event.subject,
            object: event.object,
            path: event.path,
        }
    }
}

use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{AccessGuard, BasicAuthorization, SECURITY_EVENTS};
use crate::errors::ApiError;
use crate::services::SecurityEventsService;
use crate::types::dto::event::EventResponse;
use crate::types::internal::role::UserRole;

const AUDITOR_ONLY: &[UserRole] = &[UserRole::Auditor];

/// Audit trail endpoint for auditors
pub struct EventsApi {
    events: Arc<SecurityEventsService>,
    guard: Arc<AccessGuard>,
}

impl EventsApi {
    pub fn new(events: Arc<SecurityEventsService>, guard: Arc<AccessGuard>) -> Self {
        Self { events, guard }
    }
}

#[derive(Tags)]
enum EventTags {
    /// Security event audit trail
    Auditing,
}

#[OpenApi(prefix_path = "/security")]
impl EventsApi {
    /// All security events in chronological order
    #[oai(path = "/events/", method = "get", tag = "EventTags::Auditing")]
    async fn list_events(
        &self,
        auth: BasicAuthorization,
    ) -> Result<Json<Vec<EventResponse>>, ApiError> {
        self.guard
            .authorize(&auth.0, SECURITY_EVENTS, AUDITOR_ONLY)
            .await?;

        let events = self
            .events
            .find_all()
            .await
            .map_err(|e| ApiError::from_service(e, SECURITY_EVENTS))?;
        Ok(Json(events.into_iter().map(EventResponse::from).collect()))
    }
}

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::errors::ServiceError;
use crate::types::db::security_event;
use crate::types::internal::audit::AuditEvent;

/// Append-only repository for security events.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a single event, stamping the creation date.
    pub async fn append(&self, event: AuditEvent) -> Result<(), ServiceError> {
        self.append_with(&self.db, event).await
    }

    /// Appends an event on the given connection so a caller can commit
    /// it together with the mutation it records.
    pub async fn append_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        event: AuditEvent,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "recording security event {} subject={} object={}",
            event.action,
            event.subject,
            event.object
        );

        security_event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            date: Set(Utc::now().date_naive().to_string()),
            action: Set(event.action.as_str().to_string()),
            subject: Set(event.subject),
            object: Set(event.object),
            path: Set(event.path),
        }
        .insert(conn)
        .await
        .map_err(|e| ServiceError::database("append_security_event", e))?;

        Ok(())
    }

    /// Appends a batch on the given connection, preserving order.
    pub async fn append_all_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        events: Vec<AuditEvent>,
    ) -> Result<(), ServiceError> {
        for event in events {
            self.append_with(conn, event).await?;
        }
        Ok(())
    }

    /// Full trail in insertion order.
    pub async fn find_all(&self) -> Result<Vec<security_event::Model>, ServiceError> {
        security_event::Entity::find()
            .order_by_asc(security_event::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_all_security_events", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::audit::EventKind;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_store() -> AuditStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        AuditStore::new(db)
    }

    #[tokio::test]
    async fn append_stamps_date_and_lowercases_subject() {
        let store = setup_store().await;

        store
            .append(AuditEvent::new(
                EventKind::CreateUser,
                "Anonymous",
                "john.doe@acme.com",
                "/api/auth/signup",
            ))
            .await
            .expect("append failed");

        let all = store.find_all().await.expect("find_all failed");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].action, "CREATE_USER");
        assert_eq!(all[0].subject, "anonymous");
        assert_eq!(all[0].object, "john.doe@acme.com");
        assert_eq!(all[0].date, Utc::now().date_naive().to_string());
    }

    #[tokio::test]
    async fn batch_append_preserves_order() {
        let store = setup_store().await;

        let events = vec![
            AuditEvent::new(EventKind::GrantRole, "admin@acme.com", "one", "/api/admin/user/role"),
            AuditEvent::new(EventKind::RemoveRole, "admin@acme.com", "two", "/api/admin/user/role"),
        ];
        store
            .append_all_with(&store.db, events)
            .await
            .expect("batch append failed");

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].action, "GRANT_ROLE");
        assert_eq!(all[1].action, "REMOVE_ROLE");
        assert!(all[0].id < all[1].id);
    }
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::api::AccessGuard;
use crate::services::{
    AccountService, AuthService, PasswordPolicy, PaymentService, SecurityEventsService,
};
use crate::stores::{AuditStore, CredentialStore, PaymentStore};

/// Centralized application data, created once in main.rs and shared
/// across the endpoint groups. Stores are built first, then the
/// services that depend on them, then the request guard.
pub struct AppData {
    pub db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub audit_store: Arc<AuditStore>,
    pub payment_store: Arc<PaymentStore>,
    pub events: Arc<SecurityEventsService>,
    pub auth_service: Arc<AuthService>,
    pub accounts: Arc<AccountService>,
    pub payments: Arc<PaymentService>,
    pub guard: Arc<AccessGuard>,
}

impl AppData {
    /// Wires stores and services. The database should be connected and
    /// migrated before calling this.
    pub fn init(db: DatabaseConnection) -> Self {
        tracing::debug!("creating stores");
        let credential_store = Arc::new(CredentialStore::new(db.clone()));
        let audit_store = Arc::new(AuditStore::new(db.clone()));
        let payment_store = Arc::new(PaymentStore::new(db.clone()));

        tracing::debug!("creating services");
        let events = Arc::new(SecurityEventsService::new(audit_store.clone()));
        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            credential_store.clone(),
            events.clone(),
        ));
        let accounts = Arc::new(AccountService::new(
            db.clone(),
            credential_store.clone(),
            events.clone(),
            PasswordPolicy::new(),
        ));
        let payments = Arc::new(PaymentService::new(
            db.clone(),
            credential_store.clone(),
            payment_store.clone(),
        ));
        let guard = Arc::new(AccessGuard::new(auth_service.clone(), events.clone()));

        tracing::info!("application data initialized");
        Self {
            db,
            credential_store,
            audit_store,
            payment_store,
            events,
            auth_service,
            accounts,
            payments,
            guard,
        }
    }
}

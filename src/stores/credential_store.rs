use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::errors::ServiceError;
use crate::types::db::{role, user, user_role};
use crate::types::internal::role::UserRole;

/// Snapshot of a user row together with its assigned roles.
///
/// Role assignments are materialized from the join table on every read;
/// the snapshot is never written back as-is. Mutations go through the
/// explicit store methods below.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: user::Model,
    pub roles: Vec<role::Model>,
}

impl UserRecord {
    /// Canonical role names, sorted for stable API output.
    pub fn role_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roles.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }

    pub fn holds_role(&self, canonical_name: &str) -> bool {
        self.roles
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(canonical_name))
    }

    pub fn is_administrator(&self) -> bool {
        self.holds_role(UserRole::Administrator.canonical())
    }
}

/// Persistence for user accounts and the role catalog.
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Case-insensitive lookup by username (the account e-mail).
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, ServiceError> {
        let user = user::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(user::Column::Username)))
                    .eq(username.to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_by_username", e))?;

        match user {
            Some(user) => {
                let roles = self.load_roles(&self.db, user.id).await?;
                Ok(Some(UserRecord { user, roles }))
            }
            None => Ok(None),
        }
    }

    /// All users with their roles, ordered by ascending id.
    pub async fn find_all(&self) -> Result<Vec<UserRecord>, ServiceError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_all_users", e))?;

        let mut records = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.load_roles(&self.db, user.id).await?;
            records.push(UserRecord { user, roles });
        }
        Ok(records)
    }

    /// Inserts a new user with a single initial role. User row and role
    /// assignment commit together.
    pub async fn insert_user(
        &self,
        name: &str,
        last_name: &str,
        username: &str,
        password_hash: &str,
        initial_role_id: i64,
    ) -> Result<UserRecord, ServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::database("insert_user.begin", e))?;

        let new_user = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: Set(name.to_string()),
            last_name: Set(last_name.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            locked: Set(false),
            failed_attempts: Set(0),
        };

        let user = new_user
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::database("insert_user", e))?;

        user_role::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(initial_role_id),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::database("insert_user.role", e))?;

        txn.commit()
            .await
            .map_err(|e| ServiceError::database("insert_user.commit", e))?;

        let roles = self.load_roles(&self.db, user.id).await?;
        Ok(UserRecord { user, roles })
    }

    /// Deletes a user row; role assignments and payments cascade.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), ServiceError> {
        user::Entity::delete_by_id(user_id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::database("delete_user", e))?;
        Ok(())
    }

    /// Case-insensitive lookup in the role catalog by canonical name.
    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<role::Model>, ServiceError> {
        role::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(role::Column::Name))).eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_role_by_name", e))
    }

    pub async fn set_password_hash(&self, user_id: i64, hash: &str) -> Result<(), ServiceError> {
        user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(hash))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::database("set_password_hash", e))?;
        Ok(())
    }

    /// Read-modify-write on the failed-login counter. Takes a connection
    /// so callers can fold it into a wider transaction.
    pub async fn set_failed_attempts<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        attempts: i32,
    ) -> Result<(), ServiceError> {
        user::Entity::update_many()
            .col_expr(user::Column::FailedAttempts, Expr::value(attempts))
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| ServiceError::database("set_failed_attempts", e))?;
        Ok(())
    }

    pub async fn set_locked<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        locked: bool,
    ) -> Result<(), ServiceError> {
        user::Entity::update_many()
            .col_expr(user::Column::Locked, Expr::value(locked))
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| ServiceError::database("set_locked", e))?;
        Ok(())
    }

    /// Replaces a user's role assignments with the given set.
    pub async fn replace_roles<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        role_ids: &[i64],
    ) -> Result<(), ServiceError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| ServiceError::database("replace_roles.delete", e))?;

        for role_id in role_ids {
            user_role::ActiveModel {
                user_id: Set(user_id),
                role_id: Set(*role_id),
            }
            .insert(conn)
            .await
            .map_err(|e| ServiceError::database("replace_roles.insert", e))?;
        }
        Ok(())
    }

    /// Populates the fixed role catalog if absent. Idempotent best-effort
    /// startup step: persistence errors are logged and swallowed.
    pub async fn seed_roles(&self) {
        for role in UserRole::CATALOG {
            match self.find_role_by_name(role.canonical()).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    let result = role::ActiveModel {
                        id: sea_orm::ActiveValue::NotSet,
                        name: Set(role.canonical().to_string()),
                    }
                    .insert(&self.db)
                    .await;
                    if let Err(e) = result {
                        tracing::error!("failed to seed role {}: {}", role.canonical(), e);
                    }
                }
                Err(e) => {
                    tracing::error!("failed to check role {}: {}", role.canonical(), e);
                }
            }
        }
    }

    async fn load_roles<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<role::Model>, ServiceError> {
        let links = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| ServiceError::database("load_roles.links", e))?;

        let role_ids: Vec<i64> = links.iter().map(|l| l.role_id).collect();
        role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .all(conn)
            .await
            .map_err(|e| ServiceError::database("load_roles", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_store() -> CredentialStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        let store = CredentialStore::new(db);
        store.seed_roles().await;
        store
    }

    async fn role_id(store: &CredentialStore, role: UserRole) -> i64 {
        store
            .find_role_by_name(role.canonical())
            .await
            .expect("role lookup failed")
            .expect("role not seeded")
            .id
    }

    #[tokio::test]
    async fn seed_roles_populates_full_catalog_idempotently() {
        let store = setup_store().await;

        // Second run must not duplicate or fail
        store.seed_roles().await;

        for role in UserRole::CATALOG {
            let found = store
                .find_role_by_name(role.canonical())
                .await
                .expect("lookup failed");
            assert!(found.is_some(), "missing role {}", role.canonical());
        }
    }

    #[tokio::test]
    async fn username_lookup_is_case_insensitive() {
        let store = setup_store().await;
        let admin = role_id(&store, UserRole::Administrator).await;

        store
            .insert_user("John", "Doe", "john.doe@acme.com", "$argon2$x", admin)
            .await
            .expect("insert failed");

        let found = store
            .find_by_username("JOHN.DOE@ACME.COM")
            .await
            .expect("lookup failed")
            .expect("user not found");
        assert_eq!(found.user.username, "john.doe@acme.com");
        assert!(found.is_administrator());
    }

    #[tokio::test]
    async fn find_all_orders_by_ascending_id() {
        let store = setup_store().await;
        let admin = role_id(&store, UserRole::Administrator).await;
        let user = role_id(&store, UserRole::User).await;

        store
            .insert_user("A", "A", "a@acme.com", "h", admin)
            .await
            .unwrap();
        store
            .insert_user("B", "B", "b@acme.com", "h", user)
            .await
            .unwrap();
        store
            .insert_user("C", "C", "c@acme.com", "h", user)
            .await
            .unwrap();

        let all = store.find_all().await.expect("find_all failed");
        let ids: Vec<i64> = all.iter().map(|r| r.user.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn replace_roles_swaps_assignment_set() {
        let store = setup_store().await;
        let user_role = role_id(&store, UserRole::User).await;
        let acct_role = role_id(&store, UserRole::Accountant).await;

        let record = store
            .insert_user("Jane", "Doe", "jane@acme.com", "h", user_role)
            .await
            .unwrap();

        store
            .replace_roles(&store.db, record.user.id, &[user_role, acct_role])
            .await
            .expect("replace failed");

        let updated = store
            .find_by_username("jane@acme.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            updated.role_names(),
            vec!["ROLE_ACCOUNTANT".to_string(), "ROLE_USER".to_string()]
        );
    }

    #[tokio::test]
    async fn delete_user_removes_row_and_assignments() {
        let store = setup_store().await;
        let user_role = role_id(&store, UserRole::User).await;

        let record = store
            .insert_user("Jane", "Doe", "jane@acme.com", "h", user_role)
            .await
            .unwrap();
        store.delete_user(record.user.id).await.expect("delete failed");

        assert!(store
            .find_by_username("jane@acme.com")
            .await
            .unwrap()
            .is_none());
    }
}

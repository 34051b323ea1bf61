use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use crate::errors::ServiceError;
use crate::types::db::payment;

/// Persistence for payroll records.
pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_user_and_period(
        &self,
        user_id: i64,
        period: &str,
    ) -> Result<Option<payment::Model>, ServiceError> {
        payment::Entity::find()
            .filter(payment::Column::UserId.eq(user_id))
            .filter(payment::Column::Period.eq(period))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_payment_by_user_and_period", e))
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<payment::Model>, ServiceError> {
        payment::Entity::find()
            .filter(payment::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_payments_by_user", e))
    }

    /// Inserts one payroll row on the given connection; batch callers
    /// commit all rows in one transaction.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        period: &str,
        salary: i64,
    ) -> Result<payment::Model, ServiceError> {
        payment::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(user_id),
            period: Set(period.to_string()),
            salary: Set(salary),
        }
        .insert(conn)
        .await
        .map_err(|e| ServiceError::database("insert_payment", e))
    }

    pub async fn update_salary(
        &self,
        payment_id: i64,
        salary: i64,
    ) -> Result<(), ServiceError> {
        payment::Entity::update_many()
            .col_expr(payment::Column::Salary, sea_orm::sea_query::Expr::value(salary))
            .filter(payment::Column::Id.eq(payment_id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::database("update_payment_salary", e))?;
        Ok(())
    }
}

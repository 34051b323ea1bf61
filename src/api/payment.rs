use std::sync::Arc;

use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};

use crate::api::{AccessGuard, BasicAuthorization, ACCT_PAYMENTS, EMPL_PAYMENT};
use crate::errors::ApiError;
use crate::services::{NewPayment, PaymentService};
use crate::types::dto::admin::StatusResponse;
use crate::types::dto::payment::{PaymentRequest, PaymentResponse};
use crate::types::internal::role::UserRole;

const ACCOUNTANT_ONLY: &[UserRole] = &[UserRole::Accountant];
const EMPLOYEE_ROLES: &[UserRole] = &[UserRole::User, UserRole::Accountant];

/// Payroll endpoints for accountants and employees
pub struct PaymentApi {
    payments: Arc<PaymentService>,
    guard: Arc<AccessGuard>,
}

impl PaymentApi {
    pub fn new(payments: Arc<PaymentService>, guard: Arc<AccessGuard>) -> Self {
        Self { payments, guard }
    }
}

#[derive(Tags)]
enum PaymentTags {
    /// Payroll upload and payslips
    Payroll,
}

#[OpenApi]
impl PaymentApi {
    /// Upload a batch of payroll rows
    #[oai(path = "/acct/payments", method = "post", tag = "PaymentTags::Payroll")]
    async fn add_payments(
        &self,
        auth: BasicAuthorization,
        body: Json<Vec<PaymentRequest>>,
    ) -> Result<Json<StatusResponse>, ApiError> {
        self.guard
            .authorize(&auth.0, ACCT_PAYMENTS, ACCOUNTANT_ONLY)
            .await?;

        let batch: Vec<NewPayment> = body.iter().map(NewPayment::from).collect();
        self.payments
            .add_payments(&batch)
            .await
            .map_err(|e| ApiError::from_service(e, ACCT_PAYMENTS))?;
        Ok(Json(StatusResponse {
            status: "Added successfully!".to_string(),
        }))
    }

    /// Correct the salary of one stored payroll row
    #[oai(path = "/acct/payments", method = "put", tag = "PaymentTags::Payroll")]
    async fn update_payment(
        &self,
        auth: BasicAuthorization,
        body: Json<PaymentRequest>,
    ) -> Result<Json<StatusResponse>, ApiError> {
        self.guard
            .authorize(&auth.0, ACCT_PAYMENTS, ACCOUNTANT_ONLY)
            .await?;

        self.payments
            .update_payment(&NewPayment::from(&body.0))
            .await
            .map_err(|e| ApiError::from_service(e, ACCT_PAYMENTS))?;
        Ok(Json(StatusResponse {
            status: "Updated successfully!".to_string(),
        }))
    }

    /// The caller's payslips; one payslip with `period`, all of them without
    #[oai(path = "/empl/payment", method = "get", tag = "PaymentTags::Payroll")]
    async fn get_payments(
        &self,
        auth: BasicAuthorization,
        #[oai(validator(pattern = r"^(0?[1-9]|1[012])-[0-9]{4}$"))] period: Query<Option<String>>,
    ) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
        let record = self
            .guard
            .authorize(&auth.0, EMPL_PAYMENT, EMPLOYEE_ROLES)
            .await?;

        let payslips = self
            .payments
            .find_user_payments(&record.user.username, period.0.as_deref())
            .await
            .map_err(|e| ApiError::from_service(e, EMPL_PAYMENT))?;
        Ok(Json(payslips.into_iter().map(PaymentResponse::from).collect()))
    }
}

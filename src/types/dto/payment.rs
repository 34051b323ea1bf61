use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::services::{NewPayment, PaymentDetails};

/// One payroll row in an upload or correction
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Email of the employee being paid
    pub employee: String,

    /// Pay period as "MM-YYYY"
    #[oai(validator(pattern = r"^(0?[1-9]|1[012])-[0-9]{4}$"))]
    pub period: String,

    /// Salary for the period, in cents
    #[oai(validator(minimum(value = "0")))]
    pub salary: i64,
}

impl From<&PaymentRequest> for NewPayment {
    fn from(request: &PaymentRequest) -> Self {
        Self {
            employee: request.employee.clone(),
            period: request.period.clone(),
            salary: request.salary,
        }
    }
}

/// One payslip as shown to the employee
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Given name
    pub name: String,

    /// Family name
    pub lastname: String,

    /// Pay period with the month spelled out, e.g. "January-2021"
    pub period: String,

    /// Salary rendered as "X dollar(s) Y cent(s)"
    pub salary: String,
}

impl From<PaymentDetails> for PaymentResponse {
    fn from(details: PaymentDetails) -> Self {
        Self {
            name: details.name,
            lastname: details.lastname,
            period: details.period,
            salary: details.salary,
        }
    }
}

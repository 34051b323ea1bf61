use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::errors::ServiceError;
use crate::stores::{CredentialStore, PaymentStore};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One payroll row submitted by the accountant.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub employee: String,
    pub period: String,
    pub salary: i64,
}

/// One payslip as shown to the employee, with the period spelled out
/// and the salary rendered in dollars and cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub name: String,
    pub lastname: String,
    pub period: String,
    pub salary: String,
}

/// Payroll engine: batch uploads, salary corrections and the
/// employee-facing payslip view.
pub struct PaymentService {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    payment_store: Arc<PaymentStore>,
}

impl PaymentService {
    pub fn new(
        db: DatabaseConnection,
        credential_store: Arc<CredentialStore>,
        payment_store: Arc<PaymentStore>,
    ) -> Self {
        Self {
            db,
            credential_store,
            payment_store,
        }
    }

    /// Stores a batch of payroll rows. Every employee must exist and no
    /// (employee, period) pair may repeat, within the batch or against
    /// rows already stored. The whole batch commits as one transaction.
    pub async fn add_payments(&self, payments: &[NewPayment]) -> Result<(), ServiceError> {
        let mut resolved = Vec::with_capacity(payments.len());
        let mut seen: HashSet<(i64, String)> = HashSet::new();

        for payment in payments {
            let record = self
                .credential_store
                .find_by_username(&payment.employee)
                .await?
                .ok_or_else(|| {
                    ServiceError::invalid_payment(
                        "Not possible to add payment as employee does not exist",
                    )
                })?;

            let key = (record.user.id, payment.period.clone());
            if !seen.insert(key.clone()) {
                return Err(ServiceError::invalid_payment(
                    "Impossible to add duplicated payment!",
                ));
            }
            if self
                .payment_store
                .find_by_user_and_period(record.user.id, &payment.period)
                .await?
                .is_some()
            {
                return Err(ServiceError::invalid_payment(
                    "Impossible to add duplicated payment!",
                ));
            }

            resolved.push((record.user.id, payment));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::database("add_payments.begin", e))?;
        for (user_id, payment) in &resolved {
            self.payment_store
                .insert(&txn, *user_id, &payment.period, payment.salary)
                .await?;
        }
        txn.commit()
            .await
            .map_err(|e| ServiceError::database("add_payments.commit", e))?;

        tracing::info!("stored {} payroll rows", resolved.len());
        Ok(())
    }

    /// Corrects the salary of one already-stored payroll row.
    pub async fn update_payment(&self, payment: &NewPayment) -> Result<(), ServiceError> {
        let record = self
            .credential_store
            .find_by_username(&payment.employee)
            .await?
            .ok_or_else(|| {
                ServiceError::invalid_payment(
                    "Not possible to add payment as employee does not exist",
                )
            })?;

        let stored = self
            .payment_store
            .find_by_user_and_period(record.user.id, &payment.period)
            .await?
            .ok_or(ServiceError::PaymentDoesNotExist)?;

        self.payment_store
            .update_salary(stored.id, payment.salary)
            .await?;
        tracing::info!(
            "updated salary for user {} period {}",
            payment.employee,
            payment.period
        );
        Ok(())
    }

    /// Payslips for one user. With a period, returns exactly that
    /// payslip or fails; without one, returns all payslips newest
    /// period first.
    pub async fn find_user_payments(
        &self,
        username: &str,
        period: Option<&str>,
    ) -> Result<Vec<PaymentDetails>, ServiceError> {
        let record = self
            .credential_store
            .find_by_username(username)
            .await?
            .ok_or_else(ServiceError::user_not_found)?;

        match period {
            Some(period) => {
                let payment = self
                    .payment_store
                    .find_by_user_and_period(record.user.id, period)
                    .await?
                    .ok_or(ServiceError::PaymentDoesNotExist)?;
                Ok(vec![details(
                    &record.user.name,
                    &record.user.last_name,
                    &payment.period,
                    payment.salary,
                )])
            }
            None => {
                let mut payments = self.payment_store.find_by_user(record.user.id).await?;
                payments.sort_by(|a, b| sort_key(&b.period).cmp(&sort_key(&a.period)));
                Ok(payments
                    .iter()
                    .map(|p| {
                        details(&record.user.name, &record.user.last_name, &p.period, p.salary)
                    })
                    .collect())
            }
        }
    }
}

fn details(name: &str, lastname: &str, period: &str, salary: i64) -> PaymentDetails {
    PaymentDetails {
        name: name.to_string(),
        lastname: lastname.to_string(),
        period: format_period(period),
        salary: format_salary(salary),
    }
}

/// "01-2021" -> "January-2021". Periods are validated at the DTO
/// boundary, so an unparseable month is passed through untouched.
fn format_period(period: &str) -> String {
    let Some((month, year)) = period.split_once('-') else {
        return period.to_string();
    };
    match month.parse::<usize>() {
        Ok(m) if (1..=12).contains(&m) => format!("{}-{}", MONTH_NAMES[m - 1], year),
        _ => period.to_string(),
    }
}

/// Cents -> "X dollar(s) Y cent(s)".
fn format_salary(salary: i64) -> String {
    format!("{} dollar(s) {} cent(s)", salary / 100, salary % 100)
}

/// (year, month) ordering key so "02-2022" sorts after "12-2021".
fn sort_key(period: &str) -> (i32, u8) {
    match period.split_once('-') {
        Some((month, year)) => (
            year.parse().unwrap_or(0),
            month.parse().unwrap_or(0),
        ),
        None => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AccountService, PasswordPolicy, SecurityEventsService};
    use crate::stores::AuditStore;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    struct Fixture {
        payments: PaymentService,
        accounts: AccountService,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credential_store = Arc::new(CredentialStore::new(db.clone()));
        credential_store.seed_roles().await;
        let events = Arc::new(SecurityEventsService::new(Arc::new(AuditStore::new(
            db.clone(),
        ))));
        let accounts = AccountService::new(
            db.clone(),
            credential_store.clone(),
            events,
            PasswordPolicy::new(),
        );
        let payments = PaymentService::new(
            db.clone(),
            credential_store,
            Arc::new(PaymentStore::new(db)),
        );

        Fixture { payments, accounts }
    }

    #[tokio::test]
    async fn salary_formatting_splits_dollars_and_cents() {
        assert_eq!(format_salary(123456), "1234 dollar(s) 56 cent(s)");
        assert_eq!(format_salary(100), "1 dollar(s) 0 cent(s)");
        assert_eq!(format_salary(0), "0 dollar(s) 0 cent(s)");
        assert_eq!(format_salary(7), "0 dollar(s) 7 cent(s)");
    }

    #[tokio::test]
    async fn period_formatting_spells_out_month() {
        assert_eq!(format_period("01-2021"), "January-2021");
        assert_eq!(format_period("12-2023"), "December-2023");
        assert_eq!(format_period("7-2022"), "July-2022");
    }

    #[tokio::test]
    async fn batch_upload_then_read_back_sorted() {
        let fixture = setup().await;
        fixture
            .accounts
            .register("John", "Doe", "john@acme.com", "longEnoughPw1!")
            .await
            .unwrap();

        fixture
            .payments
            .add_payments(&[
                NewPayment {
                    employee: "john@acme.com".to_string(),
                    period: "01-2021".to_string(),
                    salary: 123456,
                },
                NewPayment {
                    employee: "john@acme.com".to_string(),
                    period: "03-2021".to_string(),
                    salary: 200000,
                },
                NewPayment {
                    employee: "john@acme.com".to_string(),
                    period: "02-2021".to_string(),
                    salary: 150000,
                },
            ])
            .await
            .unwrap();

        let payslips = fixture
            .payments
            .find_user_payments("john@acme.com", None)
            .await
            .unwrap();
        let periods: Vec<_> = payslips.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["March-2021", "February-2021", "January-2021"]);
        assert_eq!(payslips[2].salary, "1234 dollar(s) 56 cent(s)");
        assert_eq!(payslips[2].name, "John");
        assert_eq!(payslips[2].lastname, "Doe");
    }

    #[tokio::test]
    async fn duplicate_period_within_batch_is_rejected() {
        let fixture = setup().await;
        fixture
            .accounts
            .register("John", "Doe", "john@acme.com", "longEnoughPw1!")
            .await
            .unwrap();

        let err = fixture
            .payments
            .add_payments(&[
                NewPayment {
                    employee: "john@acme.com".to_string(),
                    period: "01-2021".to_string(),
                    salary: 100,
                },
                NewPayment {
                    employee: "john@acme.com".to_string(),
                    period: "01-2021".to_string(),
                    salary: 200,
                },
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPayment { .. }));
    }

    #[tokio::test]
    async fn duplicate_against_stored_rows_keeps_batch_out() {
        let fixture = setup().await;
        fixture
            .accounts
            .register("John", "Doe", "john@acme.com", "longEnoughPw1!")
            .await
            .unwrap();
        fixture
            .payments
            .add_payments(&[NewPayment {
                employee: "john@acme.com".to_string(),
                period: "01-2021".to_string(),
                salary: 100,
            }])
            .await
            .unwrap();

        let err = fixture
            .payments
            .add_payments(&[
                NewPayment {
                    employee: "john@acme.com".to_string(),
                    period: "02-2021".to_string(),
                    salary: 100,
                },
                NewPayment {
                    employee: "john@acme.com".to_string(),
                    period: "01-2021".to_string(),
                    salary: 100,
                },
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPayment { .. }));

        // Nothing from the failed batch landed
        let payslips = fixture
            .payments
            .find_user_payments("john@acme.com", None)
            .await
            .unwrap();
        assert_eq!(payslips.len(), 1);
    }

    #[tokio::test]
    async fn unknown_employee_is_rejected() {
        let fixture = setup().await;
        let err = fixture
            .payments
            .add_payments(&[NewPayment {
                employee: "ghost@acme.com".to_string(),
                period: "01-2021".to_string(),
                salary: 100,
            }])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPayment { .. }));
    }

    #[tokio::test]
    async fn update_payment_corrects_salary() {
        let fixture = setup().await;
        fixture
            .accounts
            .register("John", "Doe", "john@acme.com", "longEnoughPw1!")
            .await
            .unwrap();
        fixture
            .payments
            .add_payments(&[NewPayment {
                employee: "john@acme.com".to_string(),
                period: "01-2021".to_string(),
                salary: 100,
            }])
            .await
            .unwrap();

        fixture
            .payments
            .update_payment(&NewPayment {
                employee: "john@acme.com".to_string(),
                period: "01-2021".to_string(),
                salary: 999,
            })
            .await
            .unwrap();

        let payslips = fixture
            .payments
            .find_user_payments("john@acme.com", Some("01-2021"))
            .await
            .unwrap();
        assert_eq!(payslips[0].salary, "9 dollar(s) 99 cent(s)");
    }

    #[tokio::test]
    async fn missing_period_reports_payment_does_not_exist() {
        let fixture = setup().await;
        fixture
            .accounts
            .register("John", "Doe", "john@acme.com", "longEnoughPw1!")
            .await
            .unwrap();

        let err = fixture
            .payments
            .find_user_payments("john@acme.com", Some("01-2021"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PaymentDoesNotExist));
    }
}

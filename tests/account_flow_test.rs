use account_service::app_data::AppData;
use account_service::errors::ServiceError;
use account_service::services::NewPayment;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

async fn setup() -> AppData {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app_data = AppData::init(db);
    app_data.credential_store.seed_roles().await;
    app_data
}

#[tokio::test]
async fn full_account_lifecycle() {
    let app = setup().await;

    // First registration becomes the administrator
    let admin = app
        .accounts
        .register("Jane", "Admin", "jane@acme.com", "strongEnough12!")
        .await
        .expect("admin signup failed");
    assert_eq!(admin.role_names(), vec!["ROLE_ADMINISTRATOR"]);

    let employee = app
        .accounts
        .register("John", "Doe", "john@acme.com", "strongEnough12!")
        .await
        .expect("employee signup failed");
    assert_eq!(employee.role_names(), vec!["ROLE_USER"]);

    // Grant ACCOUNTANT, upload payroll, read the payslip back
    app.accounts
        .update_user_roles("john@acme.com", "ACCOUNTANT", "GRANT", "jane@acme.com")
        .await
        .expect("grant failed");

    app.payments
        .add_payments(&[NewPayment {
            employee: "john@acme.com".to_string(),
            period: "01-2021".to_string(),
            salary: 123456,
        }])
        .await
        .expect("payroll upload failed");

    let payslips = app
        .payments
        .find_user_payments("john@acme.com", Some("01-2021"))
        .await
        .expect("payslip lookup failed");
    assert_eq!(payslips[0].period, "January-2021");
    assert_eq!(payslips[0].salary, "1234 dollar(s) 56 cent(s)");

    // Authentication works and the audit trail shows the history
    app.auth_service
        .authenticate("john@acme.com", "strongEnough12!", "/api/empl/payment")
        .await
        .expect("authentication failed");

    let actions: Vec<String> = app
        .events
        .find_all()
        .await
        .expect("event lookup failed")
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(actions, vec!["CREATE_USER", "CREATE_USER", "GRANT_ROLE"]);
}

#[tokio::test]
async fn lockout_and_unlock_round_trip() {
    let app = setup().await;
    app.accounts
        .register("Jane", "Admin", "jane@acme.com", "strongEnough12!")
        .await
        .unwrap();
    app.accounts
        .register("John", "Doe", "john@acme.com", "strongEnough12!")
        .await
        .unwrap();

    for _ in 0..5 {
        let _ = app
            .auth_service
            .authenticate("john@acme.com", "wrongPassword!", "/api/empl/payment")
            .await;
    }

    let err = app
        .auth_service
        .authenticate("john@acme.com", "strongEnough12!", "/api/empl/payment")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::LockedAccount));

    app.auth_service
        .lock_and_unlock(
            "unlock",
            "john@acme.com",
            "jane@acme.com",
            "/api/admin/user/access",
        )
        .await
        .expect("unlock failed");

    app.auth_service
        .authenticate("john@acme.com", "strongEnough12!", "/api/empl/payment")
        .await
        .expect("authentication after unlock failed");
}

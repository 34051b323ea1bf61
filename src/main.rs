use account_service::api::{AdminApi, AuthApi, EventsApi, PaymentApi};
use account_service::app_data::AppData;
use account_service::config::{init_logging, ServerSettings};
use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::Database;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();

    let settings = ServerSettings::from_env();

    if let Err(e) = init_logging(&settings.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let db = Database::connect(&settings.database_url)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("failed to connect to {}: {}", settings.database_url, e);
            std::process::exit(1);
        });
    tracing::info!("connected to database: {}", settings.database_url);

    Migrator::up(&db, None).await.unwrap_or_else(|e| {
        tracing::error!("migration failed: {}", e);
        std::process::exit(1);
    });
    tracing::info!("database migrations completed");

    let app_data = AppData::init(db);
    app_data.credential_store.seed_roles().await;

    let auth_api = AuthApi::new(app_data.accounts.clone(), app_data.guard.clone());
    let admin_api = AdminApi::new(
        app_data.accounts.clone(),
        app_data.auth_service.clone(),
        app_data.guard.clone(),
    );
    let payment_api = PaymentApi::new(app_data.payments.clone(), app_data.guard.clone());
    let events_api = EventsApi::new(app_data.events.clone(), app_data.guard.clone());

    let api_service = OpenApiService::new(
        (auth_api, admin_api, payment_api, events_api),
        "Account Service",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", settings.bind_address));
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("starting server on http://{}", settings.bind_address);
    Server::new(TcpListener::bind(settings.bind_address))
        .run(app)
        .await
}

use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::services::scheduler::AppointmentScheduler;
use insurance_cell::service::InsuranceService;
use notification_cell::{EmailNotifier, NoopNotifier, Notifier};
use shared_config::AppConfig;
use shared_database::MemoryStore;
use shared_utils::clock::SystemClock;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Shared collaborators
    let store = Arc::new(MemoryStore::new());
    store.seed_providers(&config.insurance_seed).await;

    let notifier: Arc<dyn Notifier> = if config.is_email_configured() {
        Arc::new(EmailNotifier::new(&config))
    } else {
        Arc::new(NoopNotifier)
    };

    let scheduler = Arc::new(AppointmentScheduler::new(
        store.clone(),
        store.clone(),
        notifier,
        Arc::new(SystemClock),
    ));
    let insurance = Arc::new(InsuranceService::new(store));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(scheduler, insurance)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind server address");
    axum::serve(listener, app).await.expect("server error");
}

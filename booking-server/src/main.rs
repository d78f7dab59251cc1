use std::sync::Arc;

use booking_server::auth::{AuthConfig, Authenticator};
use booking_server::booking::{ArbiterConfig, BookingArbiter};
use booking_server::catalog::Catalog;
use booking_server::config::AppConfig;
use booking_server::ledger::{CacheConfig, CachedLedger, LedgerStore, MemoryLedger, SqliteLedger};
use booking_server::search::SearchEngine;
use booking_server::web::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,booking_server=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Load the train catalog (fail fast if unreadable)
    let catalog = Catalog::load(&config.catalog_path).expect("Failed to load train catalog");
    println!(
        "Loaded {} trains from {}",
        catalog.len(),
        config.catalog_path
    );
    let catalog = Arc::new(catalog);

    // Pick the booking store
    let store: Arc<dyn LedgerStore> = match &config.database_url {
        Some(url) => Arc::new(
            SqliteLedger::connect(url)
                .await
                .expect("Failed to open bookings database"),
        ),
        None => {
            eprintln!("Warning: DATABASE_URL not set. Bookings will not survive a restart.");
            Arc::new(MemoryLedger::new())
        }
    };
    let ledger = Arc::new(CachedLedger::new(store, &CacheConfig::default()));

    // Build the core services
    let arbiter = BookingArbiter::new(
        catalog.clone(),
        ledger.clone(),
        ArbiterConfig::default().with_max_key_wait(config.max_key_wait),
    );
    let search = SearchEngine::new(catalog.clone(), ledger.clone());
    let auth =
        Authenticator::new(AuthConfig::new(&config.auth_secret).with_ttl(config.auth_token_ttl));

    // Build app state
    let state = AppState::new(arbiter, search, auth);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.bind_addr;
    println!("Train seat booking server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET    /health        - Health check");
    println!("  GET    /trains        - Search trains");
    println!("  GET    /trains/:id/seats - Seat map for a train and date");
    println!("  POST   /bookings      - Book seats");
    println!("  GET    /bookings      - List your bookings");
    println!("  DELETE /bookings/:id  - Cancel a booking");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod notify;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::{
    AdminActions, BranchOperations, ChangeRequestOperations, OpError, OrderOperations,
    RevisionOperations,
};

// Export all model types
pub use model::*;

// Export notification types
pub use notify::{MemoryNotifier, Notifier, NullNotifier, StationEvent};

// Export seed module
pub use seed::load_seed_data;

// Export store types
pub use store::{InMemoryStore, OrderStore, Store};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    let store = Arc::new(crate::store::InMemoryStore::new());
    let notifier = Arc::new(crate::notify::MemoryNotifier::new());

    // Create router with state
    let state = crate::api::AppState::new(store, notifier);
    let app = crate::api::routes::create_router().with_state(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}

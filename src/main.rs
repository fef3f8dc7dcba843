use axum::serve;
use shopfloor_vcs::api::routes::create_router;
use shopfloor_vcs::api::AppState;
use shopfloor_vcs::config::AppConfig;
use shopfloor_vcs::notify::MemoryNotifier;
use shopfloor_vcs::seed;
use shopfloor_vcs::store::InMemoryStore;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new().filter_level(LevelFilter::Info).init();

    println!("Shopfloor VCS: Manufacturing-Order Tracking Server");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(MemoryNotifier::new());

    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        println!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
        println!("Seed data loaded successfully");
    }

    let state = AppState::new(store, notifier);
    run_server(create_router().with_state(state), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("Shopfloor VCS server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}

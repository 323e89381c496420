use dashboard::logging::init_tracing;
use dashboard::router::init_router;
use dashboard::state::init_app_state;
use dashboard_config::ServerConfig;
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        error!(error = ?e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let state = init_app_state().await?;
    let app = init_router(state);

    let address = ServerConfig::from_env().bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "Server listening");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app).await?;
    Ok(())
}

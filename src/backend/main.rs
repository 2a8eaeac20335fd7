/**
 * Reflecto Server Entry Point
 *
 * Loads configuration, installs logging and serves the RPC API.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = reflecto::backend::server::config::load_config()?;

    // RUST_LOG wins over the configured environment
    let default_filter = reflecto::backend::server::config::default_log_filter(&config);
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!(filter = %env_filter, "Tracing initialized");
    reflecto::backend::server::config::log_config(&config);

    let port = config.server_port;
    let app = reflecto::backend::create_app_with_config(config);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin reflecto-server --features ssr");
    std::process::exit(1);
}

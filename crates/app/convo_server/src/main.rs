//! Conversation components webhook server binary.
//!
//! Serves the Dialogflow fulfillment endpoint until Ctrl-C.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use convo_api::config::ApiConfig;

/// CLI arguments for the webhook server.
#[derive(Parser, Debug)]
#[command(name = "convo_server", version, about = "Conversation components webhook server")]
struct Args {
    /// Interface to listen on.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Log raw request headers and bodies (debug level).
    #[arg(long, env = "LOG_REQUESTS", default_value_t = false)]
    log_requests: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,convo_api=debug,convo_core=debug")),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        log_requests: args.log_requests,
    };

    info!(
        version = convo_core::version(),
        bind_addr = %config.bind_addr,
        log_requests = config.log_requests,
        "starting convo_server"
    );

    let state = convo_api::AppState::new(config.clone())?;
    let app = convo_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "webhook listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

use crate::config::Config;
use crate::error::Error;
use crate::handlers::{health_handler, run_handler};
use crate::shutdown;
use crate::slack::{MessageSender, SlackClient};
use crate::store::{EventStore, MySqlStore};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Shared resources handed to every trigger invocation
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Config,
    /// Event store backed by the shared MySQL pool
    pub store: Arc<dyn EventStore>,
    /// Outbound chat client
    pub sender: Arc<dyn MessageSender>,
}

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Connect shared resources and serve the trigger endpoint until shutdown
pub async fn start_service(config: Config) -> miette::Result<()> {
    let store = MySqlStore::connect(&config.database_url()).await?;
    info!("Connected to MySQL at {}:{}", config.db_host, config.db_port);

    let port = config.port;
    let state = AppState {
        config,
        store: Arc::new(store),
        sender: Arc::new(SlackClient::default()),
    };

    // Build the router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/run", post(run_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address and run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(Error::Io)?;
    info!("Listening on {}", addr);

    // Create shutdown channel and spawn the signal handler task
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send).await;
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_recv.await;
        })
        .await
        .map_err(Error::Io)?;

    info!("Server stopped");
    Ok(())
}

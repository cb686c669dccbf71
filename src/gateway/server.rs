// file: src/gateway/server.rs
// description: gateway lifecycle: client acquisition, serving, graceful shutdown and release
// reference: https://docs.rs/axum/latest/axum/serve/index.html

use crate::config::Config;
use crate::error::Result;
use crate::gateway::dispatcher::BackgroundDispatcher;
use crate::gateway::router::build_router;
use crate::gateway::state::AppState;
use crate::mcp::McpClient;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Extra time granted to background jobs on top of the outbound timeout.
const DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Owns the shared MCP client and the background worker for the lifetime of
/// the process. Both are released by [`Gateway::shutdown`].
pub struct Gateway {
    config: Arc<Config>,
    mcp: Arc<McpClient>,
    router: Router,
    dispatcher_task: JoinHandle<()>,
}

impl Gateway {
    /// Must be called inside a tokio runtime; spawns the background dispatcher.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let config = Arc::new(config);
        let mcp = Arc::new(McpClient::new(&config.mcp)?);
        let (dispatcher, dispatcher_task) =
            BackgroundDispatcher::spawn(Arc::clone(&mcp), &config.background);

        let state = AppState::new(Arc::clone(&config), Arc::clone(&mcp), dispatcher);

        Ok(Self {
            router: build_router(state),
            config,
            mcp,
            dispatcher_task,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn serve<F>(mut self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(
            "Gateway listening on {} (mcp server: {})",
            addr,
            self.mcp.base_url()
        );

        let router = std::mem::take(&mut self.router);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        self.shutdown().await;
        Ok(())
    }

    /// Stops intake, waits for queued background jobs, then drops the client.
    pub async fn shutdown(self) {
        info!("Shutting down GitHub Chat MCP integration");

        let Self {
            config,
            mcp,
            router,
            mut dispatcher_task,
        } = self;
        drop(router);

        let drain = config.mcp.timeout() + DRAIN_GRACE;
        match tokio::time::timeout(drain, &mut dispatcher_task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("background dispatcher crashed: {}", e),
            Err(_) => {
                warn!(
                    "Background jobs still running after {:.0}s, aborting",
                    drain.as_secs_f64()
                );
                dispatcher_task.abort();
            }
        }

        drop(mcp);
        info!("MCP client released");
    }
}

/// Binds `server.host:server.port` and serves until Ctrl+C or SIGTERM.
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting GitHub Chat MCP integration");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let gateway = Gateway::new(config)?;
    let listener = TcpListener::bind(&addr).await?;

    gateway.serve(listener, shutdown_signal()).await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let ctrl_c = tokio::signal::ctrl_c();
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                if let Err(e) = ctrl_c.await {
                    error!("Failed to listen for Ctrl+C: {}", e);
                }
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    }
}

//! ServerBuilder for fluent API to build the HTTP server

use super::handlers::AppState;
use super::router::{build_health_routes, build_sales_routes};
use crate::config::ServiceConfig;
use crate::core::query::PageLimits;
use crate::core::service::SalesQueryService;
use crate::core::store::SalesStore;
use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for the sales API server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(SqliteSalesStore::connect("database/sales.db", "sales", 8).await?)
///     .with_page_limits(config.page_limits())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn SalesStore>>,
    limits: PageLimits,
    cors_origins: Vec<String>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            limits: PageLimits::default(),
            cors_origins: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Apply the query and CORS sections of a service configuration
    pub fn with_config(self, config: &ServiceConfig) -> Self {
        self.with_page_limits(config.page_limits())
            .with_cors_origins(config.server.cors_origins.clone())
    }

    /// Set the sales store (required)
    pub fn with_store(mut self, store: impl SalesStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared sales store (required unless `with_store` is used)
    pub fn with_shared_store(mut self, store: Arc<dyn SalesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override default and maximum page sizes
    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Restrict CORS to the given origins; empty allows any origin
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the query service without any HTTP wiring
    pub fn build_service(&mut self) -> Result<SalesQueryService> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("SalesStore is required. Call .with_store()"))?;
        Ok(SalesQueryService::new(store).with_limits(self.limits))
    }

    /// Build the final router
    ///
    /// This generates:
    /// - `/api/sales` and `/api/filters`
    /// - `/health` and `/healthz`
    /// - any custom routes
    ///
    /// wrapped in request tracing and CORS layers.
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;
        let cors = self.cors_layer()?;

        let mut app = build_health_routes().merge(build_sales_routes(AppState::new(service)));
        for custom in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        ))
    }

    fn cors_layer(&self) -> Result<CorsLayer> {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any);

        if self.cors_origins.is_empty() {
            return Ok(layer.allow_origin(Any));
        }

        let origins = self
            .cors_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{}'", o))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(layer.allow_origin(AllowOrigin::list(origins)))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

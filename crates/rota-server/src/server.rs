//! Server state management and orchestration.
//!
//! Wires the seeded store and the token verifier into the booking service
//! shared by every request handler, and runs the HTTP listener.

use crate::auth::{StaticTokenVerifier, TokenVerifier};
use crate::booking::BookingService;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::seed::SeedData;
use rota_store::DocumentStore;
use std::sync::Arc;

/// Shared application state for the HTTP server.
pub struct AppState {
    /// The allocation protocol every handler delegates to
    booking: BookingService,
}

impl AppState {
    /// Create application state from configuration: load and validate the
    /// seed records, load the token map, build the booking service.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if either file cannot be loaded.
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        tracing::info!("Loading seed data from {:?}", config.seed);
        let store = SeedData::load_store(&config.seed)?;

        tracing::info!("Loading token map from {:?}", config.tokens);
        let verifier = StaticTokenVerifier::from_file(&config.tokens)?;
        tracing::info!("Loaded {} tokens", verifier.len());

        Ok(Self::with_parts(Arc::new(store), Arc::new(verifier)))
    }

    /// Create application state from already-built parts. This is how tests
    /// and embedders inject their own store or verifier.
    #[must_use]
    pub fn with_parts(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            booking: BookingService::new(store, verifier),
        }
    }

    /// The booking service.
    #[must_use]
    pub const fn booking(&self) -> &BookingService {
        &self.booking
    }
}

/// Server orchestration.
pub struct Server {
    /// Shared application state
    state: Arc<AppState>,
    /// Server configuration
    config: ServerConfig,
}

impl Server {
    /// Create new server with configuration.
    ///
    /// Loads the seed records and token map and prepares shared state.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if seed or token data cannot be loaded.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let state = AppState::new(&config)?;

        Ok(Self {
            state: Arc::new(state),
            config,
        })
    }

    /// Run the server until interrupted.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if binding fails.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting rota server");
        tracing::info!("HTTP server binding to: {}", self.config.http_bind);

        let bind = self.config.http_bind;
        let state = self.state.clone();

        let http_server = tokio::spawn(async move {
            if let Err(e) = crate::http::start_server(bind, state).await {
                tracing::error!("HTTP server failed: {e}");
            }
        });

        // Wait for shutdown signal
        tokio::signal::ctrl_c().await.map_err(|e| {
            ServerError::Shutdown(format!("Failed to listen for shutdown signal: {e}"))
        })?;

        tracing::info!("Shutdown signal received, stopping server");
        http_server.abort();

        Ok(())
    }

    /// Get shared application state (for testing).
    #[cfg(test)]
    #[must_use]
    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

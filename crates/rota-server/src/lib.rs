//! Weekly course-slot reservation server.
//!
//! This crate orchestrates the rota allocation protocol: students reserve
//! recurring weekly hour ranges on capacity-limited courses without
//! double-booking across the location's opening hours, the course's own
//! offered hours and their personal timetable.
//!
//! # Architecture
//!
//! The server uses a library-first design with the following components:
//! - `booking`: the allocation protocol (subscribe/unsubscribe)
//! - `auth`: caller identity resolution
//! - `seed`: startup data loading and validation
//! - `config`: configuration loading and validation
//! - `http`: axum router and request handlers
//! - `server`: shared state and orchestration
//!
//! # Example
//!
//! ```no_run
//! use rota_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Initialize logging
//!     tracing_subscriber::fmt::init();
//!
//!     // Load configuration from CLI args and environment
//!     let config = ServerConfig::from_args();
//!     config.validate()?;
//!
//!     // Create and run server
//!     let server = Server::new(config)?;
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Capacity under race
//!
//! Concurrent subscribes for the last seats of a slot are resolved after the
//! reservation write, not before: each racer re-ranks the live reservations
//! by store admission order and withdraws its own write when it ranks past
//! the course limit. No more than `limit` reservations ever stay live for a
//! (course, slot) pair.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Module declarations
pub mod auth;
pub mod booking;
pub mod config;
pub mod error;
pub mod http;
pub mod seed;
pub mod server;

// Re-exports for public API
pub use auth::{Identity, StaticTokenVerifier, TokenVerifier};
pub use booking::{BookingService, SlotAvailability};
pub use config::ServerConfig;
pub use error::{BookingError, ConfigError, SeedError, ServerError};
pub use seed::SeedData;
pub use server::{AppState, Server};

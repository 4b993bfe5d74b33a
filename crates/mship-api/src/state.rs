//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The locks are `parking_lot`, not `tokio::sync`, because handlers
//! never hold them across `.await` points — every engine and manager
//! operation is synchronous and runs to completion under one guard,
//! which also provides the per-shipment serialization the core assumes.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use mship_engine::ShipmentBook;
use mship_ledger::{InMemoryDocumentRegistry, InMemoryEscrow, StaticAccessVerifier};
use mship_manager::ShipmentManager;

/// The concrete shipment book served by this process.
pub type Book = ShipmentBook<InMemoryEscrow, InMemoryDocumentRegistry, StaticAccessVerifier>;

/// The concrete per-order shipment manager served by this process.
pub type Manager = ShipmentManager<InMemoryEscrow, InMemoryDocumentRegistry, StaticAccessVerifier>;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The engine-workflow shipments.
    pub book: Arc<RwLock<Book>>,
    /// The manager-workflow orders, keyed by trade UUID.
    pub orders: Arc<RwLock<BTreeMap<Uuid, Manager>>>,
    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create an empty state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create an empty state with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            book: Arc::new(RwLock::new(Book::new())),
            orders: Arc::new(RwLock::new(BTreeMap::new())),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

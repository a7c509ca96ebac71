//! # Phone Store
//!
//! Client-side state for a small phone storefront backed by a REST API.
//!
//! ## Features
//! - Product catalog with case-insensitive title search
//! - Product detail view and cart preview modal
//! - Cart persisted locally, with subtotal/tax/total
//! - Checkout hand-off to the payment backend
//!
//! ## Architecture
//! Actor-based with channels:
//! - Shell (stdin) - turns text commands into UI events
//! - App Layer (state container)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod config;
pub mod models;
pub mod storage;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::StoreConfig;
pub use models::{CartItem, CartTotals, CheckoutResponse, Product};
pub use storage::Storage;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiClient, NetworkActor};

//! Pricing table, hosted Stripe checkout and confirmation pages for a video
//! production service.
//!
//! ```text
//! GET /  ->  POST /checkout  ->  Stripe hosted checkout  ->  /success | /cancel
//! ```

pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod contact;
pub mod cors;
pub mod error;
pub mod flight_flags;
pub mod keep_alive;
pub mod logger;
pub mod orchestrator;
pub mod pages;
pub mod routes;
pub mod stripe;

pub use catalog::{Catalog, Offering};
pub use checkout::{CheckoutInitiator, CheckoutRequest, CheckoutResponse, CheckoutResult};
pub use client::StripeClient;
pub use config::{CheckoutSettings, ServerSettings};
pub use error::{CatalogError, CheckoutError, ContactError};
pub use orchestrator::{CheckoutOrchestrator, CheckoutOutcome, Notification, PageRegistry};
pub use routes::AppState;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

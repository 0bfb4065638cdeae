//! NOWPayments IPN - verification and parsing of NOWPayments webhook callbacks
//!
//! NOWPayments signs every IPN (Instant Payment Notification) callback with
//! HMAC-SHA512 over the JSON body with its keys sorted, and sends the hex
//! digest in the `x-nowpayments-sig` header. This crate checks that
//! signature in constant time and turns the body into a typed
//! [`NormalizedPayload`](ipn::NormalizedPayload).
//!
//! # Features
//!
//! - **Verification**: canonical JSON signing, constant-time comparison
//! - **Parsing**: provider fields mapped to stable names, derived status flags
//! - **Status vocabulary**: payment and payout statuses with classification
//! - **Adapter**: framework-agnostic callback handling, with an axum binding
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nowpayments::{ConfigBuilder, IpnVerifier};
//!
//! # fn main() -> nowpayments::Result<()> {
//! nowpayments::init_tracing();
//!
//! let config = ConfigBuilder::new().from_env().build()?;
//! let verifier = IpnVerifier::from_config(&config.ipn);
//!
//! let body = r#"{"payment_id":1,"payment_status":"finished","order_id":"user_42"}"#;
//! let signature = "..."; // x-nowpayments-sig header
//!
//! let payment = verifier.parse_callback(body, Some(signature))?;
//! if payment.is_completed {
//!     println!("credit user {:?}", payment.user_id);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
#[cfg(feature = "axum")]
pub mod http;
pub mod ipn;
mod utils;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, DEFAULT_SIGNATURE_HEADER, IpnConfig, LoggingConfig};
pub use error::{BoxError, IpnError, RejectionBody, Result};
#[cfg(feature = "axum")]
pub use http::{AxumCallbackRequest, AxumCallbackResponse, ipn_router};
pub use ipn::{
    IpnAdapter, IpnHandler, IpnVerifier, NormalizedPayload, PaymentStatus, PayoutStatus,
    StatusClass, classify,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`). Set
/// `NOWPAYMENTS_LOG_JSON=true` for JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install_subscriber(filter, utils::env_flag("LOG_JSON").unwrap_or(false));
}

/// Install a global `tracing` subscriber from a [`LoggingConfig`].
pub fn init_tracing_with_config(config: &LoggingConfig) {
    install_subscriber(EnvFilter::new(&config.level), config.json);
}

fn install_subscriber(filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

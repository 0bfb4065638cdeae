//! axum binding for the IPN callback adapter.

pub mod router;

pub use router::{AxumCallbackRequest, AxumCallbackResponse, ipn_router};

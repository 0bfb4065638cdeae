//! IPN (Instant Payment Notification) callback handling.
//!
//! Verifies the `x-nowpayments-sig` HMAC-SHA512 signature over the
//! canonical JSON form of the callback body, maps provider fields to a
//! [`NormalizedPayload`], and classifies the payment status.

pub mod canonical;
pub mod handler;
pub mod payload;
pub mod status;
pub mod verification;

pub use canonical::{canonical_json, canonicalize};
pub use handler::{
    CallbackOutcome, CallbackRequest, CallbackResponse, HandlerFn, IpnAdapter, IpnHandler,
    handler_fn,
};
pub use payload::{NormalizedPayload, extract_user_id};
pub use status::{
    PaymentStatus, PayoutStatus, StatusClass, UnknownStatus, classify, is_payment_completed,
    is_payment_failed, is_payment_partial, is_payment_pending,
};
pub use verification::{CallbackBody, IpnVerifier, SIGNATURE_HEX_LEN, sign};

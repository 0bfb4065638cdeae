use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::canonical::canonical_json;
use super::payload::NormalizedPayload;
use crate::config::IpnConfig;
use crate::error::{IpnError, Result};

type HmacSha512 = Hmac<Sha512>;

/// Length of a hex-encoded HMAC-SHA512 digest.
pub const SIGNATURE_HEX_LEN: usize = 128;

/// Compute the provider signature for a payload.
///
/// The payload is canonicalized, serialized compactly and signed with
/// HMAC-SHA512 keyed by the UTF-8 bytes of `secret`. Returns lowercase hex.
pub fn sign(payload: &Value, secret: &str) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(canonical_json(payload).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of two signatures.
///
/// Unequal lengths return early; the digest length is fixed and public.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}

/// Raw callback body, either already decoded or still in wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackBody<'a> {
    Json(Value),
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl CallbackBody<'_> {
    fn decode(self) -> Result<Value> {
        let decoded = match self {
            CallbackBody::Json(value) => return Ok(value),
            CallbackBody::Text(text) => serde_json::from_str(text),
            CallbackBody::Bytes(bytes) => serde_json::from_slice(bytes),
        };

        decoded.map_err(|e| {
            tracing::warn!(
                target: "nowpayments::ipn",
                error = %e,
                "Failed to decode IPN payload"
            );
            IpnError::malformed_payload(e.to_string())
        })
    }
}

impl From<Value> for CallbackBody<'_> {
    fn from(value: Value) -> Self {
        CallbackBody::Json(value)
    }
}

impl<'a> From<&'a str> for CallbackBody<'a> {
    fn from(text: &'a str) -> Self {
        CallbackBody::Text(text)
    }
}

impl<'a> From<&'a String> for CallbackBody<'a> {
    fn from(text: &'a String) -> Self {
        CallbackBody::Text(text.as_str())
    }
}

impl<'a> From<&'a [u8]> for CallbackBody<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        CallbackBody::Bytes(bytes)
    }
}

/// Verifies and parses NOWPayments IPN callbacks.
///
/// Holds the shared IPN secret and nothing else, so one verifier can be
/// shared across concurrent requests. A verifier may be built without a
/// secret; every verification then fails with [`IpnError::Configuration`].
///
/// # Example
///
/// ```rust,ignore
/// use nowpayments::ipn::IpnVerifier;
///
/// let verifier = IpnVerifier::new("your_ipn_secret");
/// let payment = verifier.parse_callback(body.as_str(), headers.get("x-nowpayments-sig"))?;
/// if payment.is_completed {
///     credit_user(payment.user_id.as_deref());
/// }
/// ```
#[derive(Debug)]
pub struct IpnVerifier {
    secret: Option<SecretString>,
}

impl IpnVerifier {
    pub fn new(secret: impl Into<SecretString>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    /// Verifier with no secret configured.
    pub fn unconfigured() -> Self {
        Self { secret: None }
    }

    pub fn from_config(config: &IpnConfig) -> Self {
        Self {
            secret: config
                .ipn_secret
                .as_ref()
                .map(|secret| SecretString::from(secret.expose_secret())),
        }
    }

    fn secret(&self) -> Result<&str> {
        match self.secret.as_ref().map(|s| s.expose_secret()) {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => {
                tracing::error!(target: "nowpayments::ipn", "IPN secret is not configured");
                Err(IpnError::Configuration)
            }
        }
    }

    /// Verify a callback signature against a decoded payload.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the signature matches, `Ok(false)` if it is absent,
    /// empty, or wrong, and `Err(IpnError::Configuration)` when no secret
    /// is configured.
    pub fn verify_signature(&self, payload: &Value, signature: Option<&str>) -> Result<bool> {
        let secret = self.secret()?;

        let provided = match signature {
            Some(sig) if !sig.is_empty() => sig,
            _ => {
                tracing::debug!(target: "nowpayments::ipn", "IPN signature missing");
                return Ok(false);
            }
        };

        let expected = sign(payload, secret);
        if expected.len() != provided.len() {
            tracing::debug!(
                target: "nowpayments::ipn",
                expected_len = expected.len(),
                provided_len = provided.len(),
                "IPN signature length mismatch"
            );
            return Ok(false);
        }

        let is_valid = constant_time_compare(expected.as_bytes(), provided.as_bytes());
        if !is_valid {
            tracing::debug!(target: "nowpayments::ipn", "IPN signature verification failed");
        }

        Ok(is_valid)
    }

    /// Same as [`verify_signature`](Self::verify_signature).
    pub fn verify_ipn_callback(&self, payload: &Value, signature: Option<&str>) -> Result<bool> {
        self.verify_signature(payload, signature)
    }

    /// Decode, verify and normalize a callback.
    ///
    /// # Errors
    ///
    /// - [`IpnError::MalformedPayload`] if a text body is not JSON
    /// - [`IpnError::Configuration`] if no secret is configured
    /// - [`IpnError::InvalidSignature`] if the signature is absent or wrong
    pub fn parse_callback<'a>(
        &self,
        body: impl Into<CallbackBody<'a>>,
        signature: Option<&str>,
    ) -> Result<NormalizedPayload> {
        let body: CallbackBody<'a> = body.into();
        let payload = body.decode()?;

        if !self.verify_signature(&payload, signature)? {
            return Err(IpnError::InvalidSignature);
        }

        Ok(NormalizedPayload::from_raw(payload))
    }
}

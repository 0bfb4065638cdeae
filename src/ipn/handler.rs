use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{Value, json};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::payload::NormalizedPayload;
use super::verification::{CallbackBody, IpnVerifier};
use crate::config::{DEFAULT_SIGNATURE_HEADER, IpnConfig};
use crate::error::{IpnError, Result};

/// Read side of an inbound callback request.
///
/// Implement this for the request type of your HTTP stack. Header lookup
/// should be case-insensitive.
pub trait CallbackRequest {
    fn header(&self, name: &str) -> Option<&str>;

    fn body(&self) -> CallbackBody<'_>;
}

/// Write side of the callback response.
pub trait CallbackResponse: Send {
    /// Whether a response has already been sent.
    fn is_sent(&self) -> bool;

    fn send(&mut self, status: u16, body: Value);
}

/// Application logic run for every verified callback.
///
/// The handler may answer the provider itself through `response`; if it
/// does not, the adapter replies `200 {"success": true}` once it returns.
/// Errors and panics both end in a `400` rejection.
///
/// # Example
///
/// ```rust,ignore
/// use nowpayments::ipn::{CallbackResponse, IpnHandler, NormalizedPayload};
///
/// struct CreditBalance {
///     db: DatabaseConnection,
/// }
///
/// #[async_trait]
/// impl IpnHandler for CreditBalance {
///     async fn handle(
///         &self,
///         payment: &NormalizedPayload,
///         _response: &mut dyn CallbackResponse,
///     ) -> Result<()> {
///         if payment.is_completed {
///             // credit payment.user_id
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait IpnHandler: Send + Sync {
    async fn handle(
        &self,
        payment: &NormalizedPayload,
        response: &mut dyn CallbackResponse,
    ) -> Result<()>;
}

#[async_trait]
impl<H: IpnHandler + ?Sized> IpnHandler for Arc<H> {
    async fn handle(
        &self,
        payment: &NormalizedPayload,
        response: &mut dyn CallbackResponse,
    ) -> Result<()> {
        (**self).handle(payment, response).await
    }
}

/// Handler built from an async closure. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap an async closure taking the verified payload as an [`IpnHandler`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(NormalizedPayload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    HandlerFn { f }
}

#[async_trait]
impl<F, Fut> IpnHandler for HandlerFn<F>
where
    F: Fn(NormalizedPayload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn handle(
        &self,
        payment: &NormalizedPayload,
        _response: &mut dyn CallbackResponse,
    ) -> Result<()> {
        (self.f)(payment.clone()).await
    }
}

/// Result of processing one callback.
#[derive(Debug)]
pub enum CallbackOutcome {
    /// Signature verified and handler completed.
    Accepted,
    /// Rejected before or by the handler; a 400 response was sent.
    Rejected(IpnError),
}

impl CallbackOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CallbackOutcome::Accepted)
    }
}

/// Connects the verifier to an HTTP stack.
///
/// Each call to [`handle`](Self::handle) reads the signature header and
/// body, verifies and parses the callback, runs the handler, and writes
/// the response. Errors never escape: every failure becomes a
/// `400 {"success": false, "error": ...}` response.
pub struct IpnAdapter<H> {
    verifier: Arc<IpnVerifier>,
    handler: H,
    signature_header: String,
}

impl<H: IpnHandler> IpnAdapter<H> {
    pub fn new(verifier: impl Into<Arc<IpnVerifier>>, handler: H) -> Self {
        Self {
            verifier: verifier.into(),
            handler,
            signature_header: DEFAULT_SIGNATURE_HEADER.to_string(),
        }
    }

    /// Adapter using the secret and signature header from `config`.
    pub fn from_config(config: &IpnConfig, handler: H) -> Self {
        Self::new(IpnVerifier::from_config(config), handler)
            .with_signature_header(config.signature_header.clone())
    }

    /// Read the signature from a different header.
    pub fn with_signature_header(mut self, header: impl Into<String>) -> Self {
        self.signature_header = header.into();
        self
    }

    pub fn signature_header(&self) -> &str {
        &self.signature_header
    }

    pub fn verifier(&self) -> &IpnVerifier {
        &self.verifier
    }

    /// Process one callback request.
    pub async fn handle<R>(&self, request: &R, response: &mut dyn CallbackResponse) -> CallbackOutcome
    where
        R: CallbackRequest + Sync + ?Sized,
    {
        match self.process(request, response).await {
            Ok(()) => {
                if !response.is_sent() {
                    response.send(200, json!({ "success": true }));
                }
                CallbackOutcome::Accepted
            }
            Err(err) => {
                match &err {
                    IpnError::Configuration | IpnError::Handler(_) => {
                        tracing::error!(target: "nowpayments::ipn", error = %err, "IPN processing error");
                    }
                    _ => {
                        tracing::warn!(target: "nowpayments::ipn", error = %err, "IPN callback rejected");
                    }
                }

                if !response.is_sent() {
                    let body = serde_json::to_value(err.rejection_body())
                        .unwrap_or_else(|_| json!({ "success": false }));
                    response.send(err.status_code(), body);
                }
                CallbackOutcome::Rejected(err)
            }
        }
    }

    async fn process<R>(&self, request: &R, response: &mut dyn CallbackResponse) -> Result<()>
    where
        R: CallbackRequest + Sync + ?Sized,
    {
        let signature = request.header(&self.signature_header);
        let payment = self.verifier.parse_callback(request.body(), signature)?;

        tracing::info!(
            target: "nowpayments::ipn",
            payment_id = ?payment.payment_id,
            status = payment.status.as_deref().unwrap_or(""),
            "IPN callback verified"
        );

        let result = AssertUnwindSafe(self.handler.handle(&payment, response))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(IpnError::Handler(source))) => Err(IpnError::Handler(source)),
            Ok(Err(other)) => Err(IpnError::handler(other)),
            Err(panic) => Err(IpnError::handler(format!(
                "handler panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        *msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

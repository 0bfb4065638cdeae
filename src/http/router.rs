use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::ipn::{CallbackBody, CallbackRequest, CallbackResponse, IpnAdapter, IpnHandler};

/// Callback request as received by axum: headers plus the raw body.
///
/// The body is kept as bytes so the payload is decoded exactly once, by
/// the verifier.
#[derive(Debug, Clone)]
pub struct AxumCallbackRequest {
    headers: HeaderMap,
    body: Bytes,
}

impl AxumCallbackRequest {
    pub fn new(headers: HeaderMap, body: Bytes) -> Self {
        Self { headers, body }
    }
}

impl CallbackRequest for AxumCallbackRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn body(&self) -> CallbackBody<'_> {
        CallbackBody::Bytes(&self.body)
    }
}

/// Response buffer filled by the adapter, converted into an axum response.
#[derive(Debug, Default)]
pub struct AxumCallbackResponse {
    sent: Option<(StatusCode, Value)>,
}

impl CallbackResponse for AxumCallbackResponse {
    fn is_sent(&self) -> bool {
        self.sent.is_some()
    }

    fn send(&mut self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.sent = Some((status, body));
    }
}

impl IntoResponse for AxumCallbackResponse {
    fn into_response(self) -> Response {
        let (status, body) = self
            .sent
            .unwrap_or_else(|| (StatusCode::OK, json!({ "success": true })));
        (status, Json(body)).into_response()
    }
}

async fn receive_callback<H>(
    State(adapter): State<Arc<IpnAdapter<H>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    H: IpnHandler + 'static,
{
    let request = AxumCallbackRequest::new(headers, body);
    let mut response = AxumCallbackResponse::default();
    adapter.handle(&request, &mut response).await;
    response.into_response()
}

/// Build a router that accepts IPN callbacks with `POST` on `path`.
///
/// # Example
///
/// ```rust,ignore
/// use nowpayments::{IpnVerifier, ipn::{IpnAdapter, handler_fn}, ipn_router};
///
/// let adapter = IpnAdapter::new(
///     IpnVerifier::new("your_ipn_secret"),
///     handler_fn(|payment| async move {
///         tracing::info!(user_id = ?payment.user_id, "payment received");
///         Ok(())
///     }),
/// );
///
/// let app = axum::Router::new().merge(ipn_router(adapter, "/webhooks/nowpayments"));
/// ```
pub fn ipn_router<H>(adapter: IpnAdapter<H>, path: &str) -> Router
where
    H: IpnHandler + 'static,
{
    Router::new()
        .route(path, post(receive_callback::<H>))
        .with_state(Arc::new(adapter))
}

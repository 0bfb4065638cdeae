//! Minimal IPN receiver.
//!
//! ```bash
//! NOWPAYMENTS_IPN_SECRET=your_secret cargo run --example ipn_server
//! ```
//!
//! Then point the NOWPayments IPN callback URL at
//! `http://<host>:3000/webhooks/nowpayments`.

use nowpayments::ipn::{IpnAdapter, handler_fn};
use nowpayments::{ConfigBuilder, NormalizedPayload, StatusClass, ipn_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigBuilder::new().from_env().build()?;
    nowpayments::init_tracing_with_config(&config.logging);

    let adapter = IpnAdapter::from_config(
        &config.ipn,
        handler_fn(|payment: NormalizedPayload| async move {
            match payment.status_class() {
                StatusClass::Completed => {
                    tracing::info!(user_id = ?payment.user_id, amount = ?payment.pay_amount, "Payment completed");
                }
                StatusClass::Partial => {
                    tracing::warn!(user_id = ?payment.user_id, paid = ?payment.actually_paid, "Payment partially paid");
                }
                StatusClass::Failed => {
                    tracing::warn!(payment_id = ?payment.payment_id, "Payment failed");
                }
                StatusClass::Pending | StatusClass::Unclassified => {
                    tracing::debug!(status = ?payment.status, "Payment update");
                }
            }
            Ok::<(), nowpayments::IpnError>(())
        }),
    );

    let app = ipn_router(adapter, "/webhooks/nowpayments");

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

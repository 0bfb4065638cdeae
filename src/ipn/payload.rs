use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::{PaymentStatus, StatusClass, classify};

/// Prefix marking order ids that embed a user id (`user_<id>`).
pub const USER_ORDER_PREFIX: &str = "user_";

/// A verified IPN callback with provider fields mapped to stable names.
///
/// Only built after the signature has been checked. Identifiers and amounts
/// are kept as delivered (number or string); `raw` holds the untouched body
/// for fields not mapped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPayload {
    pub payment_id: Option<Value>,
    pub status: Option<String>,

    pub deposit_address: Option<String>,
    pub pay_currency: Option<String>,
    pub pay_amount: Option<Value>,
    pub actually_paid: Option<Value>,

    pub price_amount: Option<Value>,
    pub price_currency: Option<String>,

    pub outcome_amount: Option<Value>,
    pub outcome_currency: Option<String>,

    pub order_id: Option<String>,
    pub order_description: Option<String>,
    pub purchase_id: Option<Value>,

    /// Derived from `order_id`
    pub user_id: Option<String>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,

    pub is_completed: bool,
    pub is_partially_paid: bool,
    pub is_failed: bool,
    pub is_pending: bool,

    pub raw: Value,
}

impl NormalizedPayload {
    pub(crate) fn from_raw(raw: Value) -> Self {
        let status = text_field(&raw, "payment_status");
        let class = status
            .as_deref()
            .map(classify)
            .unwrap_or(StatusClass::Unclassified);
        let order_id = text_field(&raw, "order_id");

        Self {
            payment_id: value_field(&raw, "payment_id"),
            deposit_address: text_field(&raw, "pay_address"),
            pay_currency: text_field(&raw, "pay_currency"),
            pay_amount: value_field(&raw, "pay_amount"),
            actually_paid: value_field(&raw, "actually_paid"),
            price_amount: value_field(&raw, "price_amount"),
            price_currency: text_field(&raw, "price_currency"),
            outcome_amount: value_field(&raw, "outcome_amount"),
            outcome_currency: text_field(&raw, "outcome_currency"),
            user_id: extract_user_id(order_id.as_deref()),
            order_id,
            order_description: text_field(&raw, "order_description"),
            purchase_id: value_field(&raw, "purchase_id"),
            created_at: text_field(&raw, "created_at"),
            updated_at: text_field(&raw, "updated_at"),
            is_completed: class == StatusClass::Completed,
            is_partially_paid: class == StatusClass::Partial,
            is_failed: class == StatusClass::Failed,
            is_pending: class == StatusClass::Pending,
            status,
            raw,
        }
    }

    pub fn status_class(&self) -> StatusClass {
        self.status
            .as_deref()
            .map(classify)
            .unwrap_or(StatusClass::Unclassified)
    }

    /// Typed status, when the provider sent one from the known vocabulary.
    pub fn payment_status(&self) -> Option<PaymentStatus> {
        self.status.as_deref().and_then(PaymentStatus::from_wire)
    }
}

/// Extract the user id from an order id.
///
/// `user_123` yields `123`; any other non-empty order id is returned
/// verbatim; a missing or empty order id yields `None`.
pub fn extract_user_id(order_id: Option<&str>) -> Option<String> {
    let order_id = order_id.filter(|id| !id.is_empty())?;

    Some(
        order_id
            .strip_prefix(USER_ORDER_PREFIX)
            .unwrap_or(order_id)
            .to_string(),
    )
}

fn value_field(raw: &Value, key: &str) -> Option<Value> {
    raw.get(key).filter(|v| !v.is_null()).cloned()
}

// Numbers and booleans in text fields are rendered as their JSON text.
fn text_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

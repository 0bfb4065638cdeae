//! Payment and payout status vocabularies.
//!
//! [`PaymentStatus`] is the single table the classifier reads from. Each
//! status knows its [`StatusClass`]; the `is_payment_*` predicates and the
//! booleans on [`NormalizedPayload`](super::NormalizedPayload) are all
//! derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse outcome of a payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Completed,
    Pending,
    Failed,
    Partial,
    /// Status not in the known vocabulary.
    Unclassified,
}

/// Payment statuses reported in IPN callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Waiting,
    Confirming,
    Confirmed,
    Sending,
    PartiallyPaid,
    Finished,
    Failed,
    Refunded,
    Expired,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 9] = [
        PaymentStatus::Waiting,
        PaymentStatus::Confirming,
        PaymentStatus::Confirmed,
        PaymentStatus::Sending,
        PaymentStatus::PartiallyPaid,
        PaymentStatus::Finished,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
        PaymentStatus::Expired,
    ];

    /// Wire value as sent by the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Waiting => "waiting",
            PaymentStatus::Confirming => "confirming",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Sending => "sending",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Finished => "finished",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Expired => "expired",
        }
    }

    pub const fn class(self) -> StatusClass {
        match self {
            PaymentStatus::Finished | PaymentStatus::Confirmed => StatusClass::Completed,
            PaymentStatus::Waiting | PaymentStatus::Confirming | PaymentStatus::Sending => {
                StatusClass::Pending
            }
            PaymentStatus::Failed | PaymentStatus::Expired | PaymentStatus::Refunded => {
                StatusClass::Failed
            }
            PaymentStatus::PartiallyPaid => StatusClass::Partial,
        }
    }

    /// Look up a wire value. Matching is exact and case-sensitive.
    pub fn from_wire(status: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == status)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a status outside the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Payout statuses. The provider sends these upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    Waiting,
    Pending,
    Processing,
    Finished,
    Failed,
    Rejected,
}

impl PayoutStatus {
    pub const ALL: [PayoutStatus; 6] = [
        PayoutStatus::Waiting,
        PayoutStatus::Pending,
        PayoutStatus::Processing,
        PayoutStatus::Finished,
        PayoutStatus::Failed,
        PayoutStatus::Rejected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PayoutStatus::Waiting => "WAITING",
            PayoutStatus::Pending => "PENDING",
            PayoutStatus::Processing => "PROCESSING",
            PayoutStatus::Finished => "FINISHED",
            PayoutStatus::Failed => "FAILED",
            PayoutStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayoutStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Classify a bare payment status string.
pub fn classify(status: &str) -> StatusClass {
    PaymentStatus::from_wire(status)
        .map(PaymentStatus::class)
        .unwrap_or(StatusClass::Unclassified)
}

pub fn is_payment_completed(status: &str) -> bool {
    classify(status) == StatusClass::Completed
}

pub fn is_payment_pending(status: &str) -> bool {
    classify(status) == StatusClass::Pending
}

pub fn is_payment_failed(status: &str) -> bool {
    classify(status) == StatusClass::Failed
}

pub fn is_payment_partial(status: &str) -> bool {
    classify(status) == StatusClass::Partial
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        assert_eq!(classify("finished"), StatusClass::Completed);
        assert_eq!(classify("confirmed"), StatusClass::Completed);
        assert_eq!(classify("waiting"), StatusClass::Pending);
        assert_eq!(classify("confirming"), StatusClass::Pending);
        assert_eq!(classify("sending"), StatusClass::Pending);
        assert_eq!(classify("failed"), StatusClass::Failed);
        assert_eq!(classify("expired"), StatusClass::Failed);
        assert_eq!(classify("refunded"), StatusClass::Failed);
        assert_eq!(classify("partially_paid"), StatusClass::Partial);
    }

    #[test]
    fn test_unknown_status_is_unclassified() {
        for status in ["bogus", "", "FINISHED", "finished ", "partially-paid"] {
            assert_eq!(classify(status), StatusClass::Unclassified, "{status:?}");
            assert!(!is_payment_completed(status));
            assert!(!is_payment_pending(status));
            assert!(!is_payment_failed(status));
            assert!(!is_payment_partial(status));
        }
    }

    #[test]
    fn test_predicates_partition_vocabulary() {
        for status in PaymentStatus::ALL {
            let s = status.as_str();
            let hits = [
                is_payment_completed(s),
                is_payment_pending(s),
                is_payment_failed(s),
                is_payment_partial(s),
            ]
            .into_iter()
            .filter(|hit| *hit)
            .count();
            assert_eq!(hits, 1, "{s} should match exactly one predicate");
        }
    }

    #[test]
    fn test_payment_status_round_trips_wire_value() {
        for status in PaymentStatus::ALL {
            assert_eq!(status.as_str().parse::<PaymentStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
        assert_eq!(
            "nope".parse::<PaymentStatus>(),
            Err(UnknownStatus("nope".to_string()))
        );
    }

    #[test]
    fn test_payment_status_serde_matches_wire_value() {
        let json = serde_json::to_string(&PaymentStatus::PartiallyPaid).unwrap();
        assert_eq!(json, "\"partially_paid\"");
    }

    #[test]
    fn test_payout_status_vocabulary() {
        let values: Vec<&str> = PayoutStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            values,
            ["WAITING", "PENDING", "PROCESSING", "FINISHED", "FAILED", "REJECTED"]
        );
        assert_eq!("REJECTED".parse::<PayoutStatus>(), Ok(PayoutStatus::Rejected));
        assert!("finished".parse::<PayoutStatus>().is_err());

        let json = serde_json::to_string(&PayoutStatus::Processing).unwrap();
        assert_eq!(json, "\"PROCESSING\"");
    }
}

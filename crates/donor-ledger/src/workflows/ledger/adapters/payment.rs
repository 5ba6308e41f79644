use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{lenient_number, lenient_string, normalize_token, resolve_timestamp};
use super::SourceAdapter;
use crate::workflows::ledger::domain::{
    DonationEvent, DonationStatus, EventSource, EventTimestamp, UNKNOWN_BLOOD_TYPE,
};

/// Monetary payment as returned by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPayment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

/// Gateway status of a settled payment.
pub const SUCCESS_STATUS: &str = "SUCCESS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed,
    Cancelled,
    Unrecognized,
}

impl PaymentStatus {
    /// Exact `SUCCESS` is the only settled status; the remaining vocabulary
    /// is matched case-insensitively.
    pub fn parse(raw: &str) -> Self {
        if raw == SUCCESS_STATUS {
            return Self::Success;
        }

        match normalize_token(raw).as_str() {
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unrecognized,
        }
    }

    pub const fn ledger_status(self) -> DonationStatus {
        match self {
            Self::Success => DonationStatus::Completed,
            Self::Failed | Self::Cancelled => DonationStatus::Inactive,
            Self::Pending | Self::Unrecognized => DonationStatus::Pending,
        }
    }
}

/// Normalized payment. Status and amount are carried as received; only the
/// gateway's `SUCCESS` status counts toward impact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentEvent {
    pub transaction_id: String,
    pub amount: f64,
    pub status: String,
    pub occurred_at: DateTime<Utc>,
    pub timestamp_inferred: bool,
}

impl PaymentEvent {
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::parse(&self.status)
    }

    pub fn is_successful(&self) -> bool {
        self.payment_status() == PaymentStatus::Success
    }

    /// Projection used for activity feeds; never part of the eligibility ledger.
    pub fn to_donation_event(&self) -> DonationEvent {
        let timestamp = EventTimestamp {
            at: self.occurred_at,
            inferred: self.timestamp_inferred,
        };
        DonationEvent::new(
            self.transaction_id.clone(),
            EventSource::MonetaryPayment,
            timestamp,
            UNKNOWN_BLOOD_TYPE,
            0,
            self.payment_status().ledger_status(),
        )
    }
}

pub struct PaymentAdapter;

impl SourceAdapter for PaymentAdapter {
    type Raw = RawPayment;
    type Event = PaymentEvent;

    const SOURCE: EventSource = EventSource::MonetaryPayment;

    fn raw_id(raw: &Self::Raw) -> Option<&str> {
        raw.transaction_id.as_deref()
    }

    fn normalize(raw: &Self::Raw, id: String, now: DateTime<Utc>) -> Self::Event {
        let occurred_at = resolve_timestamp(&[raw.created_at.as_deref()], now);
        PaymentEvent {
            transaction_id: id,
            amount: raw.amount.unwrap_or(0.0),
            status: raw.status.clone().unwrap_or_default(),
            occurred_at: occurred_at.at,
            timestamp_inferred: occurred_at.inferred,
        }
    }
}

/// Activity-feed projection of payments, in input order.
pub fn payments_as_ledger_events(payments: &[PaymentEvent]) -> Vec<DonationEvent> {
    payments.iter().map(PaymentEvent::to_donation_event).collect()
}

//! Per-origin adapters turning raw upstream records into ledger events.
//!
//! Every adapter is total: malformed fields are normalized (see `fields`) and
//! never surface as errors.

pub(crate) mod fields;
pub mod hospital;
pub mod payment;
pub mod registration;

pub use fields::parse_datetime;
pub use hospital::{
    HospitalDonationAdapter, RawAppointmentDetails, RawBloodInfo, RawHospitalDonation,
};
pub use payment::{
    payments_as_ledger_events, PaymentAdapter, PaymentEvent, PaymentStatus, RawPayment,
};
pub use registration::{DonorRegistrationAdapter, RawDonorRegistration};

use super::domain::{DonationEvent, EventSource};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Normalization contract for one upstream record shape.
pub trait SourceAdapter {
    type Raw;
    type Event;

    const SOURCE: EventSource;

    fn raw_id(raw: &Self::Raw) -> Option<&str>;

    fn normalize(raw: &Self::Raw, id: String, now: DateTime<Utc>) -> Self::Event;
}

/// Adapts a whole collection. Repeated upstream ids keep their first
/// occurrence. Records without an id get a positional one that never collides
/// with an upstream id, so they are never dropped as duplicates.
pub fn adapt<A: SourceAdapter>(records: &[A::Raw], now: DateTime<Utc>) -> Vec<A::Event> {
    let upstream_ids: HashSet<&str> = records.iter().filter_map(A::raw_id).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut events = Vec::with_capacity(records.len());

    for (index, raw) in records.iter().enumerate() {
        let id = match A::raw_id(raw) {
            Some(id) => {
                if seen.contains(id) {
                    debug!(source = A::SOURCE.label(), %id, "skipping duplicate record");
                    continue;
                }
                id.to_string()
            }
            None => positional_id(A::SOURCE, index, &upstream_ids, &seen),
        };

        seen.insert(id.clone());
        events.push(A::normalize(raw, id, now));
    }

    events
}

fn positional_id(
    source: EventSource,
    index: usize,
    upstream_ids: &HashSet<&str>,
    seen: &HashSet<String>,
) -> String {
    let base = format!("{}-{}", source.id_prefix(), index);
    let mut candidate = base.clone();
    let mut suffix = 1;
    while upstream_ids.contains(candidate.as_str()) || seen.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    candidate
}

pub fn adapt_hospital_donations(
    records: &[RawHospitalDonation],
    now: DateTime<Utc>,
) -> Vec<DonationEvent> {
    adapt::<HospitalDonationAdapter>(records, now)
}

pub fn adapt_registrations(
    records: &[RawDonorRegistration],
    now: DateTime<Utc>,
) -> Vec<DonationEvent> {
    adapt::<DonorRegistrationAdapter>(records, now)
}

pub fn adapt_payments(records: &[RawPayment], now: DateTime<Utc>) -> Vec<PaymentEvent> {
    adapt::<PaymentAdapter>(records, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::ledger::domain::DonationStatus;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn positional_ids_never_shadow_upstream_ids() {
        let raw: Vec<RawHospitalDonation> = serde_json::from_value(json!([
            { "_id": "hospital-1", "status": "completed", "submittedAt": "2025-05-01" },
            { "status": "completed", "submittedAt": "2025-05-02" },
            { "status": "completed", "submittedAt": "2025-05-03" },
            { "_id": "hospital-2", "status": "completed", "submittedAt": "2025-05-04" }
        ]))
        .expect("valid payload");

        let events = adapt_hospital_donations(&raw, now());
        let ids: Vec<&str> = events.iter().map(DonationEvent::id).collect();
        assert_eq!(
            ids,
            vec!["hospital-1", "hospital-1-1", "hospital-2-1", "hospital-2"]
        );
    }

    #[test]
    fn repeated_upstream_ids_keep_first_occurrence() {
        let raw: Vec<RawHospitalDonation> = serde_json::from_value(json!([
            { "_id": "h-1", "status": "completed" },
            { "_id": "h-1", "status": "rejected" },
            { "status": "pending" }
        ]))
        .expect("valid payload");

        let events = adapt_hospital_donations(&raw, now());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id(), "h-1");
        assert_eq!(events[0].status(), DonationStatus::Completed);
        assert_eq!(events[1].id(), "hospital-2");
    }
}

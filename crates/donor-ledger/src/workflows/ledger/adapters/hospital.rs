use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fields::{
    blood_type_or_unknown, lenient, lenient_number, lenient_string, normalize_token,
    resolve_timestamp,
};
use super::SourceAdapter;
use crate::workflows::ledger::domain::{DonationEvent, DonationStatus, EventSource};

/// Millilitres in one standard whole-blood unit.
pub const MILLILITRES_PER_UNIT: f64 = 450.0;

/// Blood details attached to a hospital appointment or a registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBloodInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub blood_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAppointmentDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub donation_center: Option<String>,
}

/// Hospital donation appointment as returned by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHospitalDonation {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blood_info: Option<RawBloodInfo>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub submitted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub donation_center: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub appointment_details: Option<RawAppointmentDetails>,
}

pub struct HospitalDonationAdapter;

impl SourceAdapter for HospitalDonationAdapter {
    type Raw = RawHospitalDonation;
    type Event = DonationEvent;

    const SOURCE: EventSource = EventSource::HospitalDonation;

    fn raw_id(raw: &Self::Raw) -> Option<&str> {
        raw.id.as_deref()
    }

    fn normalize(raw: &Self::Raw, id: String, now: DateTime<Utc>) -> Self::Event {
        let occurred_at = resolve_timestamp(
            &[raw.submitted_at.as_deref(), raw.created_at.as_deref()],
            now,
        );
        let blood_info = raw.blood_info.as_ref();
        let blood_type =
            blood_type_or_unknown(&[blood_info.and_then(|info| info.blood_type.as_deref())]);
        let units = units_from_millilitres(blood_info.and_then(|info| info.quantity));
        let status = hospital_status(raw.status.as_deref());
        let location = raw.donation_center.clone().or_else(|| {
            raw.appointment_details
                .as_ref()
                .and_then(|details| details.donation_center.clone())
        });

        if occurred_at.inferred {
            debug!(%id, "hospital donation has no usable timestamp; placing at start of today");
        }

        DonationEvent::new(id, Self::SOURCE, occurred_at, blood_type, units, status)
            .with_location(location)
    }
}

/// Whole units for a millilitre quantity; missing, negative, or non-finite input gives 0.
pub fn units_from_millilitres(quantity_ml: Option<f64>) -> u32 {
    match quantity_ml {
        Some(ml) if ml.is_finite() && ml > 0.0 => {
            let units = (ml / MILLILITRES_PER_UNIT).round();
            units.min(u32::MAX as f64) as u32
        }
        _ => 0,
    }
}

/// Maps the appointment vocabulary onto ledger statuses; anything unrecognized stays pending.
pub fn hospital_status(raw: Option<&str>) -> DonationStatus {
    let Some(raw) = raw else {
        return DonationStatus::Pending;
    };

    match normalize_token(raw).as_str() {
        "pending" | "scheduled" | "requested" => DonationStatus::Pending,
        "approved" | "accepted" | "confirmed" => DonationStatus::Approved,
        "completed" | "complete" | "donated" | "fulfilled" | "done" => DonationStatus::Completed,
        "rejected" | "declined" | "cancelled" | "canceled" | "no-show" | "no show" => {
            DonationStatus::Inactive
        }
        other => {
            debug!(status = other, "unrecognized hospital donation status; treating as pending");
            DonationStatus::Pending
        }
    }
}

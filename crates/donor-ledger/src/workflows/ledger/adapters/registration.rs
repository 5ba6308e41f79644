use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::fields::{blood_type_or_unknown, lenient_bool, lenient_string, resolve_timestamp};
use super::hospital::RawBloodInfo;
use super::SourceAdapter;
use crate::workflows::ledger::domain::{DonationEvent, DonationStatus, EventSource};

/// Emergency-donor registration as returned by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDonorRegistration {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub registered_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "blood_info_or_type")]
    pub blood_info: Option<RawBloodInfo>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub blood_type: Option<String>,
}

/// Registrations send `bloodInfo` either as a bare blood type or as a nested object.
fn blood_info_or_type<'de, D>(deserializer: D) -> Result<Option<RawBloodInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(blood_type) => Some(RawBloodInfo {
            blood_type: Some(blood_type.trim().to_string()),
            quantity: None,
        }),
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

pub struct DonorRegistrationAdapter;

impl SourceAdapter for DonorRegistrationAdapter {
    type Raw = RawDonorRegistration;
    type Event = DonationEvent;

    const SOURCE: EventSource = EventSource::DonorRegistration;

    fn raw_id(raw: &Self::Raw) -> Option<&str> {
        raw.id.as_deref()
    }

    fn normalize(raw: &Self::Raw, id: String, now: DateTime<Utc>) -> Self::Event {
        let occurred_at = resolve_timestamp(
            &[raw.registered_at.as_deref(), raw.created_at.as_deref()],
            now,
        );
        let blood_type = blood_type_or_unknown(&[
            raw.blood_info
                .as_ref()
                .and_then(|info| info.blood_type.as_deref()),
            raw.blood_type.as_deref(),
        ]);
        let status = if raw.is_active.unwrap_or(false) {
            DonationStatus::Active
        } else {
            DonationStatus::Inactive
        };

        DonationEvent::new(id, Self::SOURCE, occurred_at, blood_type, 0, status)
    }
}

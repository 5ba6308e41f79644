use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    HospitalDonation,
    DonorRegistration,
    MonetaryPayment,
}

impl EventSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HospitalDonation => "Hospital Donation",
            Self::DonorRegistration => "Emergency Donor Registration",
            Self::MonetaryPayment => "Monetary Donation",
        }
    }

    /// Tie-break rank used when two events share an instant; lower sorts first.
    pub(crate) const fn merge_rank(self) -> u8 {
        match self {
            Self::HospitalDonation => 0,
            Self::DonorRegistration => 1,
            Self::MonetaryPayment => 2,
        }
    }

    pub(crate) const fn id_prefix(self) -> &'static str {
        match self {
            Self::HospitalDonation => "hospital",
            Self::DonorRegistration => "registration",
            Self::MonetaryPayment => "payment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Pending,
    Approved,
    Active,
    Inactive,
    Completed,
}

impl DonationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Completed => "Completed",
        }
    }

    /// Approved and completed donations are the only ones that count as given blood.
    pub const fn is_fulfilled(self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }
}

pub const HOSPITAL_DONATION_POINTS: u32 = 100;
pub const ACTIVE_REGISTRATION_POINTS: u32 = 50;

/// Points awarded for an event; depends only on where it came from and its status.
pub const fn points_for(source: EventSource, status: DonationStatus) -> u32 {
    match (source, status) {
        (EventSource::HospitalDonation, DonationStatus::Approved | DonationStatus::Completed) => {
            HOSPITAL_DONATION_POINTS
        }
        (EventSource::DonorRegistration, DonationStatus::Active) => ACTIVE_REGISTRATION_POINTS,
        _ => 0,
    }
}

/// A single normalized entry of a donor's activity ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonationEvent {
    id: String,
    source: EventSource,
    occurred_at: DateTime<Utc>,
    timestamp_inferred: bool,
    blood_type: String,
    units: u32,
    status: DonationStatus,
    points: u32,
    location: Option<String>,
}

impl DonationEvent {
    pub fn new(
        id: impl Into<String>,
        source: EventSource,
        occurred_at: EventTimestamp,
        blood_type: impl Into<String>,
        units: u32,
        status: DonationStatus,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            occurred_at: occurred_at.at,
            timestamp_inferred: occurred_at.inferred,
            blood_type: blood_type.into(),
            units,
            status,
            points: points_for(source, status),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> EventSource {
        self.source
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn timestamp_inferred(&self) -> bool {
        self.timestamp_inferred
    }

    pub fn blood_type(&self) -> &str {
        &self.blood_type
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn status(&self) -> DonationStatus {
        self.status
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_fulfilled_hospital_donation(&self) -> bool {
        self.source == EventSource::HospitalDonation && self.status.is_fulfilled()
    }

    pub fn to_view(&self) -> DonationEventView {
        DonationEventView {
            id: self.id.clone(),
            source: self.source,
            source_label: self.source.label(),
            occurred_at: self.occurred_at,
            timestamp_inferred: self.timestamp_inferred,
            blood_type: self.blood_type.clone(),
            units: self.units,
            status: self.status,
            status_label: self.status.label(),
            points: self.points,
            location: self.location.clone(),
        }
    }
}

/// Resolved timestamp of a raw record, remembering whether it had to be synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTimestamp {
    pub at: DateTime<Utc>,
    pub inferred: bool,
}

impl EventTimestamp {
    pub fn recorded(at: DateTime<Utc>) -> Self {
        Self {
            at,
            inferred: false,
        }
    }

    /// Stand-in for a missing timestamp: the start of the current UTC day, so the
    /// event stays in "today" without outranking anything recorded today.
    pub fn inferred(now: DateTime<Utc>) -> Self {
        let at = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        Self { at, inferred: true }
    }
}

pub const UNKNOWN_BLOOD_TYPE: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct DonationEventView {
    pub id: String,
    pub source: EventSource,
    pub source_label: &'static str,
    pub occurred_at: DateTime<Utc>,
    pub timestamp_inferred: bool,
    pub blood_type: String,
    pub units: u32,
    pub status: DonationStatus,
    pub status_label: &'static str,
    pub points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

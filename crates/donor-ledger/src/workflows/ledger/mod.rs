//! Donor activity reconciliation: adapters normalize each upstream source, the
//! merger builds a newest-first ledger, and the evaluators derive eligibility,
//! tier, and achievements from it. Every step is a pure function of its inputs
//! and an explicit reference time.

pub mod achievements;
pub mod adapters;
pub mod domain;
pub mod eligibility;
pub mod import;
pub mod merge;
pub mod profile;
pub mod router;
pub mod service;
pub mod tier;

#[cfg(test)]
mod tests;

pub use achievements::{evaluate, AchievementInfo, Badge};
pub use adapters::{
    adapt_hospital_donations, adapt_payments, adapt_registrations, parse_datetime, PaymentEvent,
    RawDonorRegistration, RawHospitalDonation, RawPayment,
};
pub use domain::{DonationEvent, DonationStatus, EventSource};
pub use eligibility::{next_eligible, NextEligibility, DONATION_INTERVAL_DAYS};
pub use import::{DonorSnapshotImporter, PaymentExportImporter, SnapshotImportError};
pub use merge::merge;
pub use profile::{compute_donor_profile, DerivedDonorProfile, DonorProfileSummary, DonorSources};
pub use router::{profile_router, ProfileRequest, ProfileResponse};
pub use service::{Clock, DonorProfileService, FixedClock, ProfileServiceError, SystemClock};
pub use tier::{classify, DonorTier, TierInfo};

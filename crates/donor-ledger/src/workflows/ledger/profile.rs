use super::achievements::{evaluate, AchievementInfo, Badge};
use super::adapters::fields::lenient_records;
use super::adapters::{
    adapt_hospital_donations, adapt_payments, adapt_registrations, payments_as_ledger_events,
    PaymentEvent, RawDonorRegistration, RawHospitalDonation, RawPayment,
};
use super::domain::{DonationEvent, DonationEventView};
use super::eligibility::{next_eligible, NextEligibility};
use super::merge::merge;
use super::tier::{classify, TierInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three raw collections for one user, as fetched by the data layer.
/// A source whose fetch failed is simply left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSources {
    #[serde(default, deserialize_with = "lenient_records")]
    pub hospital_donations: Vec<RawHospitalDonation>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub registrations: Vec<RawDonorRegistration>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub payments: Vec<RawPayment>,
}

impl DonorSources {
    pub fn is_empty(&self) -> bool {
        self.hospital_donations.is_empty()
            && self.registrations.is_empty()
            && self.payments.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.hospital_donations.len() + self.registrations.len() + self.payments.len()
    }
}

/// Everything derived for one user on a single refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedDonorProfile {
    pub ledger: Vec<DonationEvent>,
    pub next_eligible: NextEligibility,
    pub tier: TierInfo,
    pub achievements: AchievementInfo,
    #[serde(skip)]
    payments: Vec<PaymentEvent>,
    #[serde(skip)]
    computed_at: DateTime<Utc>,
}

pub fn compute_donor_profile(sources: &DonorSources, now: DateTime<Utc>) -> DerivedDonorProfile {
    let hospital = adapt_hospital_donations(&sources.hospital_donations, now);
    let registrations = adapt_registrations(&sources.registrations, now);
    let payments = adapt_payments(&sources.payments, now);

    let ledger = merge([hospital, registrations]);
    let next_eligible = next_eligible(&ledger, now);
    let achievements = evaluate(&ledger, &payments, now);
    let tier = classify(achievements.blood_donations);

    DerivedDonorProfile {
        ledger,
        next_eligible,
        tier,
        achievements,
        payments,
        computed_at: now,
    }
}

impl DerivedDonorProfile {
    pub fn payments(&self) -> &[PaymentEvent] {
        &self.payments
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    /// Ledger plus payments, newest first, for activity feeds.
    pub fn activity(&self) -> Vec<DonationEvent> {
        merge([self.ledger.clone(), payments_as_ledger_events(&self.payments)])
    }

    pub fn summary(&self) -> DonorProfileSummary {
        let badges = self
            .achievements
            .badges()
            .into_iter()
            .map(|badge| BadgeView {
                badge,
                label: badge.label(),
            })
            .collect();

        DonorProfileSummary {
            computed_at: self.computed_at,
            next_eligible: self.next_eligible,
            eligible_now: self.next_eligible.is_now(),
            days_until_eligible: self.next_eligible.days_remaining(self.computed_at),
            tier: self.tier,
            achievements: self.achievements.clone(),
            badges,
            total_points: self.ledger.iter().map(DonationEvent::points).sum(),
            ledger: self.ledger.iter().map(DonationEvent::to_view).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeView {
    pub badge: Badge,
    pub label: &'static str,
}

/// Flattened, presentation-ready view of a profile.
#[derive(Debug, Clone, Serialize)]
pub struct DonorProfileSummary {
    pub computed_at: DateTime<Utc>,
    pub next_eligible: NextEligibility,
    pub eligible_now: bool,
    pub days_until_eligible: i64,
    pub tier: TierInfo,
    #[serde(flatten)]
    pub achievements: AchievementInfo,
    pub badges: Vec<BadgeView>,
    pub total_points: u32,
    pub ledger: Vec<DonationEventView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::ledger::tier::DonorTier;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_sources_yield_a_valid_blank_profile() {
        let profile = compute_donor_profile(&DonorSources::default(), now());
        assert!(profile.ledger.is_empty());
        assert_eq!(profile.next_eligible, NextEligibility::Now);
        assert_eq!(profile.tier.tier, DonorTier::New);
        assert_eq!(profile.achievements.total_lives_impacted, 0);
        assert!(profile.achievements.badges().is_empty());
    }

    #[test]
    fn missing_and_null_sources_deserialize_as_empty() {
        let sources: DonorSources = serde_json::from_value(json!({
            "hospitalDonations": null,
            "payments": "unavailable"
        }))
        .expect("lenient sources");
        assert!(sources.is_empty());

        let sources: DonorSources = serde_json::from_value(json!({
            "registrations": [ 7, { "_id": "r1", "isActive": true } ]
        }))
        .expect("lenient sources");
        assert_eq!(sources.registrations.len(), 1);
    }

    #[test]
    fn payments_stay_out_of_the_ledger_but_appear_in_activity() {
        let sources: DonorSources = serde_json::from_value(json!({
            "hospitalDonations": [
                { "_id": "h1", "status": "completed", "submittedAt": "2025-05-20T10:00:00Z",
                  "bloodInfo": { "bloodType": "O+", "quantity": 450 } }
            ],
            "payments": [
                { "transactionId": "t1", "amount": 20, "status": "SUCCESS", "createdAt": "2025-05-25T10:00:00Z" }
            ]
        }))
        .expect("valid sources");

        let profile = compute_donor_profile(&sources, now());
        assert_eq!(profile.ledger.len(), 1);
        assert_eq!(profile.payments().len(), 1);
        assert_eq!(profile.achievements.total_lives_impacted, 2);

        let activity = profile.activity();
        let ids: Vec<&str> = activity.iter().map(DonationEvent::id).collect();
        assert_eq!(ids, vec!["t1", "h1"]);
    }

    #[test]
    fn summary_flattens_achievements() {
        let sources: DonorSources = serde_json::from_value(json!({
            "hospitalDonations": [
                { "_id": "h1", "status": "approved", "submittedAt": "2025-05-20T12:00:00Z" }
            ]
        }))
        .expect("valid sources");

        let summary = compute_donor_profile(&sources, now()).summary();
        assert!(!summary.eligible_now);
        assert_eq!(summary.days_until_eligible, 44);
        assert_eq!(summary.total_points, 100);

        let body = serde_json::to_value(&summary).expect("serializes");
        assert_eq!(body["blood_donations"], json!(1));
        assert_eq!(body["has_first_donation"], json!(true));
        assert_eq!(body["next_eligible"], json!("2025-07-15T12:00:00Z"));
        assert_eq!(body["badges"][0]["label"], json!("First Donation"));
    }
}

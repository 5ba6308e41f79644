use super::adapters::PaymentEvent;
use super::domain::DonationEvent;
use super::eligibility::last_blood_donation;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const FIVE_LIVES_THRESHOLD: u32 = 5;
pub const REGULAR_DONOR_THRESHOLD: u32 = 3;
pub const TWENTY_DONATIONS_THRESHOLD: u32 = 20;

/// Percent shares of the illustrative impact split. Not derived from any
/// real categorization of recipients.
const EMERGENCY_SURGERY_SHARE: u32 = 30;
const CANCER_PATIENT_SHARE: u32 = 40;
const ACCIDENT_VICTIM_SHARE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstDonation,
    FiveLives,
    RegularDonor,
    TwentyDonations,
}

impl Badge {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstDonation => "First Donation",
            Self::FiveLives => "Saved 5 Lives",
            Self::RegularDonor => "Regular Donor",
            Self::TwentyDonations => "20 Donations",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementInfo {
    pub blood_donations: u32,
    pub successful_money_donations: u32,
    pub total_lives_impacted: u32,
    pub emergency_surgeries: u32,
    pub cancer_patients: u32,
    pub accident_victims: u32,
    pub has_first_donation: bool,
    pub has_five_lives: bool,
    pub is_regular_donor: bool,
    pub has_twenty_donations: bool,
    pub donations_to_twenty: u32,
    pub total_amount_donated: f64,
    pub last_blood_donation_at: Option<DateTime<Utc>>,
    pub days_since_last_blood_donation: Option<i64>,
}

impl AchievementInfo {
    pub fn badges(&self) -> Vec<Badge> {
        [
            (self.has_first_donation, Badge::FirstDonation),
            (self.has_five_lives, Badge::FiveLives),
            (self.is_regular_donor, Badge::RegularDonor),
            (self.has_twenty_donations, Badge::TwentyDonations),
        ]
        .into_iter()
        .filter_map(|(earned, badge)| earned.then_some(badge))
        .collect()
    }
}

fn share_of(total: u32, percent: u32) -> u32 {
    (u64::from(total) * u64::from(percent) / 100) as u32
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

pub fn evaluate(
    ledger: &[DonationEvent],
    payments: &[PaymentEvent],
    now: DateTime<Utc>,
) -> AchievementInfo {
    let blood_donations = saturating_count(
        ledger
            .iter()
            .filter(|event| event.is_fulfilled_hospital_donation())
            .count(),
    );

    let successful: Vec<&PaymentEvent> = payments
        .iter()
        .filter(|payment| payment.is_successful())
        .collect();
    let successful_money_donations = saturating_count(successful.len());
    let total_amount_donated: f64 = successful
        .iter()
        .map(|payment| payment.amount)
        .filter(|amount| amount.is_finite() && *amount > 0.0)
        .sum();

    let total_lives_impacted = blood_donations.saturating_add(successful_money_donations);

    let last_blood_donation_at = last_blood_donation(ledger).map(DonationEvent::occurred_at);
    let days_since_last_blood_donation =
        last_blood_donation_at.map(|at| (now - at).num_days().max(0));

    AchievementInfo {
        blood_donations,
        successful_money_donations,
        total_lives_impacted,
        emergency_surgeries: share_of(total_lives_impacted, EMERGENCY_SURGERY_SHARE),
        cancer_patients: share_of(total_lives_impacted, CANCER_PATIENT_SHARE),
        accident_victims: share_of(total_lives_impacted, ACCIDENT_VICTIM_SHARE),
        has_first_donation: total_lives_impacted >= 1,
        has_five_lives: total_lives_impacted >= FIVE_LIVES_THRESHOLD,
        is_regular_donor: blood_donations >= REGULAR_DONOR_THRESHOLD
            || successful_money_donations >= REGULAR_DONOR_THRESHOLD,
        has_twenty_donations: total_lives_impacted >= TWENTY_DONATIONS_THRESHOLD,
        donations_to_twenty: TWENTY_DONATIONS_THRESHOLD.saturating_sub(total_lives_impacted),
        total_amount_donated,
        last_blood_donation_at,
        days_since_last_blood_donation,
    }
}

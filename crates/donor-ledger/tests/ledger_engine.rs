use chrono::{DateTime, Duration, TimeZone, Utc};
use donor_ledger::workflows::ledger::{
    adapt_hospital_donations, adapt_payments, adapt_registrations, classify, compute_donor_profile,
    domain::{DonationEvent, DonationStatus, EventSource, EventTimestamp},
    evaluate, merge, next_eligible, DonorSources, DonorTier, NextEligibility, PaymentEvent,
    DONATION_INTERVAL_DAYS,
};
use serde_json::json;

fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid reference time")
}

fn sample_sources() -> DonorSources {
    serde_json::from_value(json!({
        "hospitalDonations": [
            { "_id": "h-1", "status": "completed", "bloodInfo": { "bloodType": "B+", "quantity": 450 }, "submittedAt": "2025-04-10T10:00:00Z" },
            { "_id": "h-2", "status": "approved", "bloodInfo": { "bloodType": "B+", "quantity": 450 }, "submittedAt": "2025-05-25T10:00:00Z" },
            { "_id": "h-3", "status": "mystery", "bloodInfo": { "bloodType": "B+", "quantity": -450 }, "submittedAt": "garbage" },
            { "_id": "h-4", "status": "completed", "bloodInfo": { "bloodType": "B+", "quantity": 450 }, "createdAt": "2024-12-01" }
        ],
        "registrations": [
            { "_id": "r-1", "isActive": false, "registeredAt": "2024-11-01T00:00:00Z", "bloodType": "B+" },
            { "_id": "r-2", "isActive": true, "createdAt": "2025-06-01T12:00:00Z" }
        ],
        "payments": [
            { "transactionId": "t-1", "amount": 20, "status": "SUCCESS", "createdAt": "2025-05-01T00:00:00Z" },
            { "transactionId": "t-2", "amount": 20, "status": "SUCCESS", "createdAt": "2025-05-02T00:00:00Z" },
            { "transactionId": "t-3", "amount": 20, "status": "SUCCESS", "createdAt": "2025-05-03T00:00:00Z" }
        ]
    }))
    .expect("sample sources deserialize")
}

fn hospital_event(id: &str, at: DateTime<Utc>, status: DonationStatus) -> DonationEvent {
    DonationEvent::new(
        id,
        EventSource::HospitalDonation,
        EventTimestamp::recorded(at),
        "O+",
        1,
        status,
    )
}

fn completed_hospital_events(count: usize, now: DateTime<Utc>) -> Vec<DonationEvent> {
    (0..count)
        .map(|index| {
            hospital_event(
                &format!("h-{index}"),
                now - Duration::days(60 * index as i64 + 1),
                DonationStatus::Completed,
            )
        })
        .collect()
}

fn successful_payments(count: usize, now: DateTime<Utc>) -> Vec<PaymentEvent> {
    (0..count)
        .map(|index| PaymentEvent {
            transaction_id: format!("t-{index}"),
            amount: 10.0,
            status: "SUCCESS".to_string(),
            occurred_at: now - Duration::days(index as i64 + 1),
            timestamp_inferred: false,
        })
        .collect()
}

#[test]
fn merge_keeps_every_adapted_event() {
    let now = reference_now();
    let sources = sample_sources();

    let hospital = adapt_hospital_donations(&sources.hospital_donations, now);
    let registrations = adapt_registrations(&sources.registrations, now);
    let payments: Vec<DonationEvent> = adapt_payments(&sources.payments, now)
        .iter()
        .map(PaymentEvent::to_donation_event)
        .collect();
    let expected = hospital.len() + registrations.len() + payments.len();

    let merged = merge([hospital, registrations, payments]);
    assert_eq!(merged.len(), expected);
    assert_eq!(expected, 9);

    let mut ids: Vec<&str> = merged.iter().map(DonationEvent::id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), expected, "no event duplicated");
}

#[test]
fn merged_ledger_is_newest_first() {
    let profile = compute_donor_profile(&sample_sources(), reference_now());
    for ledger in [profile.ledger.clone(), profile.activity()] {
        assert!(ledger
            .windows(2)
            .all(|pair| pair[0].occurred_at() >= pair[1].occurred_at()));
    }
}

#[test]
fn unparsable_timestamp_sinks_below_same_day_records() {
    let profile = compute_donor_profile(&sample_sources(), reference_now());
    let ids: Vec<&str> = profile.ledger.iter().map(DonationEvent::id).collect();
    assert_eq!(ids, vec!["r-2", "h-3", "h-2", "h-1", "h-4", "r-1"]);

    let broken = &profile.ledger[1];
    assert!(broken.timestamp_inferred());
    assert_eq!(broken.status(), DonationStatus::Pending);
    assert_eq!(broken.units(), 0);
    assert_eq!(
        broken.occurred_at(),
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn eligibility_never_exceeds_interval_after_latest_donation() {
    let now = reference_now();
    for offset in [0_i64, 1, 20, 55, 56, 57, 400] {
        let donated_at = now - Duration::days(offset);
        let ledger = vec![
            hospital_event("older", donated_at - Duration::days(90), DonationStatus::Completed),
            hospital_event("latest", donated_at, DonationStatus::Completed),
            hospital_event("booked", now, DonationStatus::Pending),
        ];

        match next_eligible(&ledger, now) {
            NextEligibility::Now => {
                assert!(offset >= DONATION_INTERVAL_DAYS, "offset {offset}")
            }
            NextEligibility::On(at) => {
                assert!(at <= donated_at + Duration::days(DONATION_INTERVAL_DAYS));
                assert!(at > now);
            }
        }
    }

    let without_fulfilled = vec![hospital_event("pending", now, DonationStatus::Pending)];
    assert_eq!(next_eligible(&without_fulfilled, now), NextEligibility::Now);
    assert_eq!(next_eligible(&[], now), NextEligibility::Now);
}

#[test]
fn tier_boundaries_and_monotonicity() {
    let zero = classify(0);
    assert_eq!((zero.tier, zero.progress_pct), (DonorTier::New, 0));

    let five = classify(5);
    assert_eq!((five.tier, five.progress_pct), (DonorTier::Bronze, 0));

    let twenty_four = classify(24);
    assert_eq!(
        (twenty_four.tier, twenty_four.progress_pct),
        (DonorTier::Silver, 90)
    );

    let fifty = classify(50);
    assert_eq!((fifty.tier, fifty.progress_pct), (DonorTier::Platinum, 100));
    assert_eq!(fifty.next_tier, None);

    let tiers: Vec<DonorTier> = (0..=120).map(|count| classify(count).tier).collect();
    assert!(tiers.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn badge_flags_follow_blood_and_money_counts() {
    let now = reference_now();
    let ledger = merge([completed_hospital_events(2, now)]);
    let info = evaluate(&ledger, &successful_payments(3, now), now);

    assert_eq!(info.blood_donations, 2);
    assert_eq!(info.successful_money_donations, 3);
    assert_eq!(info.total_lives_impacted, 5);
    assert!(info.has_first_donation);
    assert!(info.has_five_lives);
    assert!(info.is_regular_donor);
    assert!(!info.has_twenty_donations);
    assert_eq!(info.donations_to_twenty, 15);
}

#[test]
fn empty_sources_produce_a_valid_new_donor() {
    let profile = compute_donor_profile(&DonorSources::default(), reference_now());

    assert!(profile.ledger.is_empty());
    assert_eq!(profile.next_eligible, NextEligibility::Now);
    assert_eq!(profile.tier.tier, DonorTier::New);
    assert_eq!(profile.achievements.total_lives_impacted, 0);
    assert!(profile.achievements.badges().is_empty());

    let summary = profile.summary();
    assert!(summary.eligible_now);
    assert_eq!(summary.days_until_eligible, 0);
}

#[test]
fn recomputation_is_byte_identical() {
    let sources = sample_sources();
    let now = reference_now();

    let first = compute_donor_profile(&sources, now);
    let second = compute_donor_profile(&sources, now);
    assert_eq!(first, second);

    let first_bytes = serde_json::to_vec(&first.summary()).expect("summary serializes");
    let second_bytes = serde_json::to_vec(&second.summary()).expect("summary serializes");
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn sample_donor_profile_matches_expected_summary() {
    let profile = compute_donor_profile(&sample_sources(), reference_now());

    assert_eq!(profile.achievements.blood_donations, 3);
    assert_eq!(profile.achievements.successful_money_donations, 3);
    assert_eq!(profile.achievements.total_lives_impacted, 6);
    assert!(profile.achievements.is_regular_donor);
    assert_eq!(profile.achievements.total_amount_donated, 60.0);
    assert_eq!(
        profile.next_eligible,
        NextEligibility::On(Utc.with_ymd_and_hms(2025, 7, 20, 10, 0, 0).unwrap())
    );
    assert_eq!(profile.tier.tier, DonorTier::New);
    assert_eq!(profile.tier.donations_to_next_tier, Some(2));
}

#[test]
fn records_without_ids_are_never_mistaken_for_duplicates() {
    let sources: DonorSources = serde_json::from_value(json!({
        "hospitalDonations": [
            { "_id": "hospital-1", "status": "completed", "submittedAt": "2025-03-01T09:00:00Z" },
            { "status": "completed", "submittedAt": "2025-05-01T09:00:00Z" }
        ],
        "payments": [
            { "transactionId": "t-1", "amount": 10, "status": "success", "createdAt": "2025-05-01T00:00:00Z" }
        ]
    }))
    .expect("sources deserialize");

    let profile = compute_donor_profile(&sources, reference_now());
    assert_eq!(profile.ledger.len(), 2);
    assert_eq!(profile.achievements.blood_donations, 2);
    assert_eq!(profile.achievements.successful_money_donations, 0);
    assert_eq!(
        profile.next_eligible,
        NextEligibility::On(Utc.with_ymd_and_hms(2025, 6, 26, 9, 0, 0).unwrap())
    );
}

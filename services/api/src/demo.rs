use crate::infra::parse_reference_time;
use chrono::{DateTime, Utc};
use clap::Args;
use donor_ledger::error::AppError;
use donor_ledger::workflows::ledger::{
    DerivedDonorProfile, DonorProfileService, DonorSnapshotImporter, DonorSources, FixedClock,
    NextEligibility, PaymentExportImporter,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ProfileReportArgs {
    /// JSON snapshot holding `hospitalDonations`, `registrations`, and `payments`
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Optional payment gateway CSV export appended to the snapshot's payments
    #[arg(long)]
    pub(crate) payments_csv: Option<PathBuf>,
    /// Reference time (YYYY-MM-DD or RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_reference_time)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Include the full activity feed in the output
    #[arg(long)]
    pub(crate) list_events: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference time (YYYY-MM-DD or RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_reference_time)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_profile_report(args: ProfileReportArgs) -> Result<(), AppError> {
    let ProfileReportArgs {
        snapshot,
        payments_csv,
        now,
        list_events,
    } = args;

    let mut sources = DonorSnapshotImporter::from_path(&snapshot)?;
    if let Some(path) = payments_csv {
        let exported = PaymentExportImporter::from_path(&path)?;
        sources.payments.extend(exported);
    }

    let profile = build_profile(&sources, now)?;
    println!("Donor profile report");
    println!("Snapshot: {}", snapshot.display());
    render_profile(&profile, list_events);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let sources = sample_sources(now)?;

    println!("Donor ledger demo");
    println!(
        "Sample donor: {} hospital donations, {} registrations, {} payments",
        sources.hospital_donations.len(),
        sources.registrations.len(),
        sources.payments.len()
    );
    let profile = build_profile(&sources, Some(now))?;
    render_profile(&profile, true);
    Ok(())
}

fn build_profile(
    sources: &DonorSources,
    now: Option<DateTime<Utc>>,
) -> Result<DerivedDonorProfile, AppError> {
    let service = DonorProfileService::new(Arc::new(FixedClock(now.unwrap_or_else(Utc::now))));
    Ok(service.profile(sources, None)?)
}

/// A donor with a recent completed donation, an older one, a pending booking with a
/// broken timestamp, an active registration, and mixed payments.
fn sample_sources(now: DateTime<Utc>) -> Result<DonorSources, AppError> {
    let days_ago = |days: i64| (now - chrono::Duration::days(days)).to_rfc3339();

    let payload = json!({
        "hospitalDonations": [
            {
                "_id": "demo-h-1",
                "status": "completed",
                "bloodInfo": { "bloodType": "O-", "quantity": 450 },
                "submittedAt": days_ago(12),
                "donationCenter": "Riverside Blood Bank"
            },
            {
                "_id": "demo-h-2",
                "status": "donated",
                "bloodInfo": { "bloodType": "O-", "quantity": 900 },
                "submittedAt": days_ago(140),
                "appointmentDetails": { "donationCenter": "St. Mary's Hospital" }
            },
            {
                "_id": "demo-h-3",
                "status": "scheduled",
                "bloodInfo": { "bloodType": "O-", "quantity": "450ml" },
                "submittedAt": "not-a-date"
            }
        ],
        "registrations": [
            { "_id": "demo-r-1", "isActive": true, "registeredAt": days_ago(200), "bloodInfo": "O-" }
        ],
        "payments": [
            { "transactionId": "demo-t-1", "amount": 25.0, "status": "SUCCESS", "createdAt": days_ago(3) },
            { "transactionId": "demo-t-2", "amount": 40.0, "status": "FAILED", "createdAt": days_ago(2) },
            { "transactionId": "demo-t-3", "amount": 15.5, "status": "SUCCESS", "createdAt": days_ago(30) }
        ]
    });

    Ok(serde_json::from_value(payload)?)
}

pub(crate) fn render_profile(profile: &DerivedDonorProfile, list_events: bool) {
    let now = profile.computed_at();
    let summary = profile.summary();
    let achievements = &profile.achievements;

    println!("Computed at: {}", now.to_rfc3339());

    match profile.next_eligible {
        NextEligibility::Now => println!("\nEligibility: can donate now"),
        NextEligibility::On(at) => println!(
            "\nEligibility: next donation on {} ({} days)",
            at.format("%Y-%m-%d %H:%M UTC"),
            profile.next_eligible.days_remaining(now)
        ),
    }

    let tier = &profile.tier;
    println!("\nTier: {} ({}% to next)", tier.tier_label, tier.progress_pct);
    match (tier.next_tier, tier.donations_to_next_tier) {
        (Some(next), Some(remaining)) => {
            println!("- {} more donations to reach {}", remaining, next.label())
        }
        _ => println!("- Highest tier reached"),
    }

    println!("\nImpact");
    println!(
        "- {} blood donations | {} successful money donations ({:.2} total)",
        achievements.blood_donations,
        achievements.successful_money_donations,
        achievements.total_amount_donated
    );
    println!(
        "- {} lives impacted: {} emergency surgeries, {} cancer patients, {} accident victims",
        achievements.total_lives_impacted,
        achievements.emergency_surgeries,
        achievements.cancer_patients,
        achievements.accident_victims
    );
    match achievements.days_since_last_blood_donation {
        Some(days) => println!("- Last blood donation {} days ago", days),
        None => println!("- No completed blood donations yet"),
    }
    println!("- {} ledger points", summary.total_points);

    if summary.badges.is_empty() {
        println!("\nBadges: none yet");
    } else {
        println!("\nBadges");
        for badge in &summary.badges {
            println!("- {}", badge.label);
        }
    }
    if !achievements.has_twenty_donations {
        println!(
            "{} donations to the twenty-donation badge",
            achievements.donations_to_twenty
        );
    }

    if !list_events {
        return;
    }

    let activity = profile.activity();
    if activity.is_empty() {
        println!("\nActivity: none recorded");
        return;
    }

    println!("\nActivity (newest first)");
    for event in &activity {
        let inferred = if event.timestamp_inferred() {
            " [date unknown]"
        } else {
            ""
        };
        let location = event
            .location()
            .map(|location| format!(" @ {location}"))
            .unwrap_or_default();
        println!(
            "- {}{} | {} | {} | {} | {} units | {} pts | {}{}",
            event.occurred_at().format("%Y-%m-%d"),
            inferred,
            event.source().label(),
            event.status().label(),
            event.blood_type(),
            event.units(),
            event.points(),
            event.id(),
            location
        );
    }
}

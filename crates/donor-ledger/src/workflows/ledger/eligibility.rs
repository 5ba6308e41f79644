use super::domain::DonationEvent;
use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

/// Minimum interval between whole-blood donations.
pub const DONATION_INTERVAL_DAYS: i64 = 56;

/// When the donor may give blood again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextEligibility {
    Now,
    On(DateTime<Utc>),
}

impl NextEligibility {
    pub fn is_now(&self) -> bool {
        matches!(self, Self::Now)
    }

    /// Whole days left until eligibility, rounding partial days up.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self {
            Self::Now => 0,
            Self::On(date) => {
                let remaining = *date - now;
                let days = remaining.num_days();
                if remaining > Duration::days(days) {
                    days + 1
                } else {
                    days.max(0)
                }
            }
        }
    }
}

impl Serialize for NextEligibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Now => serializer.serialize_str("now"),
            Self::On(date) => date.serialize(serializer),
        }
    }
}

/// Most recent approved or completed hospital donation in the ledger.
pub fn last_blood_donation(ledger: &[DonationEvent]) -> Option<&DonationEvent> {
    ledger
        .iter()
        .filter(|event| event.is_fulfilled_hospital_donation())
        .max_by_key(|event| event.occurred_at())
}

pub fn next_eligible(ledger: &[DonationEvent], now: DateTime<Utc>) -> NextEligibility {
    let Some(last) = last_blood_donation(ledger) else {
        return NextEligibility::Now;
    };

    let candidate = last.occurred_at() + Duration::days(DONATION_INTERVAL_DAYS);
    if candidate <= now {
        NextEligibility::Now
    } else {
        NextEligibility::On(candidate)
    }
}

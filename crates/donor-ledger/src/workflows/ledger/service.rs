use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::adapters::fields::parse_datetime;
use super::profile::{compute_donor_profile, DerivedDonorProfile, DonorSources};

/// Source of "now" for profile computation, injectable for deterministic tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Computes donor profiles for callers that do not pass their own reference time.
pub struct DonorProfileService<C> {
    clock: Arc<C>,
}

impl<C> DonorProfileService<C>
where
    C: Clock + 'static,
{
    pub fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Computes a profile, honoring an explicit reference time when one is supplied.
    pub fn profile(
        &self,
        sources: &DonorSources,
        as_of: Option<&str>,
    ) -> Result<DerivedDonorProfile, ProfileServiceError> {
        let now = match as_of {
            Some(raw) => parse_datetime(raw)
                .ok_or_else(|| ProfileServiceError::InvalidReferenceTime(raw.to_string()))?,
            None => self.clock.now(),
        };

        let profile = compute_donor_profile(sources, now);
        info!(
            records = sources.record_count(),
            ledger = profile.ledger.len(),
            tier = profile.tier.tier_label,
            lives_impacted = profile.achievements.total_lives_impacted,
            "computed donor profile"
        );
        Ok(profile)
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error("reference time '{0}' is not a recognized date or timestamp")]
    InvalidReferenceTime(String),
}

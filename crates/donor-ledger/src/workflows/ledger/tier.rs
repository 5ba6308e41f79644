use serde::{Deserialize, Serialize};

/// Donor level earned from cumulative completed donations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorTier {
    New,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl DonorTier {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::New,
            Self::Bronze,
            Self::Silver,
            Self::Gold,
            Self::Platinum,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New Donor",
            Self::Bronze => "Bronze Donor",
            Self::Silver => "Silver Donor",
            Self::Gold => "Gold Donor",
            Self::Platinum => "Platinum Donor",
        }
    }

    /// Inclusive lower bound of the band.
    pub const fn threshold(self) -> u32 {
        match self {
            Self::New => 0,
            Self::Bronze => 5,
            Self::Silver => 15,
            Self::Gold => 25,
            Self::Platinum => 50,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::Bronze),
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::Platinum),
            Self::Platinum => None,
        }
    }

    pub fn for_count(completed: u32) -> Self {
        Self::ordered()
            .into_iter()
            .rev()
            .find(|tier| completed >= tier.threshold())
            .unwrap_or(Self::New)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierInfo {
    pub tier: DonorTier,
    pub tier_label: &'static str,
    /// Percent of the way through the current band, 0 to 100.
    pub progress_pct: u8,
    pub next_tier: Option<DonorTier>,
    pub donations_to_next_tier: Option<u32>,
}

pub fn classify(completed: u32) -> TierInfo {
    let tier = DonorTier::for_count(completed);

    let Some(next) = tier.next() else {
        return TierInfo {
            tier,
            tier_label: tier.label(),
            progress_pct: 100,
            next_tier: None,
            donations_to_next_tier: None,
        };
    };

    let band = u64::from(next.threshold() - tier.threshold());
    let into_band = u64::from(completed - tier.threshold());
    let progress_pct = (into_band * 100 / band).min(100) as u8;

    TierInfo {
        tier,
        tier_label: tier.label(),
        progress_pct,
        next_tier: Some(next),
        donations_to_next_tier: Some(next.threshold() - completed),
    }
}

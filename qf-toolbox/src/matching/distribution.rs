use super::score::campaign_score;
use num_bigint::BigUint;
use num_traits::Zero;
use round_snapshot::units::{format_units, truncate_to_precision};
use round_snapshot::{CampaignId, RoundId, RoundSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Knobs for presenting a distribution.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DistributionSettings {
    /// Fractional digits kept on each allocation. Anything finer is truncated
    /// and stays unallocated. `None` keeps full minor unit precision.
    #[serde(default)]
    pub precision: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignAllocation {
    pub campaign_id: CampaignId,
    pub score: BigUint,
    pub matching: BigUint,
}

/// Integer outcome of splitting a matching pool, in minor units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub pool: BigUint,
    pub total_score: BigUint,
    pub campaigns: Vec<CampaignAllocation>,
}

impl Allocation {
    pub fn matching_for(&self, campaign_id: CampaignId) -> Option<&BigUint> {
        self.campaigns
            .iter()
            .find(|allocation| allocation.campaign_id == campaign_id)
            .map(|allocation| &allocation.matching)
    }

    pub fn total_allocated(&self) -> BigUint {
        self.campaigns.iter().map(|allocation| &allocation.matching).sum()
    }

    /// Part of the pool lost to rounding down.
    pub fn unallocated(&self) -> BigUint {
        &self.pool - self.total_allocated()
    }

    /// Presents the allocation using the titles and counts of `snapshot`,
    /// which must be the snapshot it was computed from (or a copy of it with
    /// extra contributions). Campaigns are paired by id.
    pub(crate) fn to_distribution(&self, snapshot: &RoundSnapshot) -> Distribution {
        let decimals = snapshot.decimals();
        let per_campaign = self
            .campaigns
            .iter()
            .filter_map(|allocation| {
                let campaign = snapshot.campaign(allocation.campaign_id)?;
                Some(CampaignMatching {
                    campaign_id: allocation.campaign_id,
                    title: campaign.title().to_string(),
                    matching_amount: format_units(&allocation.matching, decimals),
                    score: allocation.score.to_str_radix(10),
                    unique_contributors: campaign.unique_contributors(),
                    contributions: campaign.total_contributions(),
                })
            })
            .collect();

        Distribution {
            round_id: snapshot.id(),
            per_campaign,
            total_allocated: format_units(&self.total_allocated(), decimals),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMatching {
    pub campaign_id: CampaignId,
    pub title: String,
    /// Decimal amount in the round's token.
    pub matching_amount: String,
    pub score: String,
    pub unique_contributors: usize,
    pub contributions: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub round_id: RoundId,
    pub per_campaign: Vec<CampaignMatching>,
    pub total_allocated: String,
}

impl Distribution {
    pub fn matching_for(&self, campaign_id: CampaignId) -> Option<&str> {
        self.per_campaign
            .iter()
            .find(|campaign| campaign.campaign_id == campaign_id)
            .map(|campaign| campaign.matching_amount.as_str())
    }
}

/// Splits the matching pool proportionally to each campaign's score.
///
/// Every share is rounded down, so the sum never exceeds the pool and falls
/// short of it by at most one minor unit per campaign. A round where nobody
/// contributed yet allocates nothing.
pub fn allocate(snapshot: &RoundSnapshot, settings: &DistributionSettings) -> Allocation {
    let pool = snapshot.matching_pool().clone();
    let scores = snapshot
        .campaigns()
        .iter()
        .map(|campaign| (campaign.id(), campaign_score(campaign)))
        .collect::<Vec<_>>();
    let total_score: BigUint = scores.iter().map(|(_, score)| score).sum();

    let campaigns = scores
        .into_iter()
        .map(|(campaign_id, score)| {
            let mut matching = if total_score.is_zero() {
                BigUint::zero()
            } else {
                &pool * &score / &total_score
            };
            if let Some(precision) = settings.precision {
                matching = truncate_to_precision(&matching, snapshot.decimals(), precision);
            }
            debug!(campaign_id, %score, %matching, "campaign allocation");
            CampaignAllocation {
                campaign_id,
                score,
                matching,
            }
        })
        .collect();

    Allocation {
        pool,
        total_score,
        campaigns,
    }
}

pub fn compute_distribution(snapshot: &RoundSnapshot) -> Distribution {
    compute_distribution_with(snapshot, &DistributionSettings::default())
}

pub fn compute_distribution_with(
    snapshot: &RoundSnapshot,
    settings: &DistributionSettings,
) -> Distribution {
    let allocation = allocate(snapshot, settings);
    let distribution = allocation.to_distribution(snapshot);
    info!(
        round_id = snapshot.id(),
        campaigns = distribution.per_campaign.len(),
        total_score = %allocation.total_score,
        total_allocated = %distribution.total_allocated,
        unallocated = %format_units(&allocation.unallocated(), snapshot.decimals()),
        "computed matching distribution"
    );
    distribution
}

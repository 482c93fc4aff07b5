use super::distribution::{allocate, Allocation, Distribution, DistributionSettings};
use super::marginal::hypothetical_contribution;
use super::Error;
use round_snapshot::units::format_units;
use round_snapshot::{CampaignId, ContributorId, RoundSnapshot};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HypotheticalContribution {
    pub campaign_id: CampaignId,
    /// Decimal amount in the round's token.
    pub amount: String,
    /// Defaults to the round's token.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDelta {
    pub campaign_id: CampaignId,
    pub title: String,
    /// Signed decimal change of the campaign's matching, `"-1.5"` for a loss.
    pub matching_delta: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Simulation {
    pub baseline: Distribution,
    pub simulated: Distribution,
    pub delta: Vec<CampaignDelta>,
}

impl Simulation {
    pub fn delta_for(&self, campaign_id: CampaignId) -> Option<&str> {
        self.delta
            .iter()
            .find(|delta| delta.campaign_id == campaign_id)
            .map(|delta| delta.matching_delta.as_str())
    }
}

/// Recomputes the distribution as if `contributor` had also made every
/// contribution in `contributions`, which may target several campaigns.
///
/// Nothing is applied unless every hypothetical contribution is valid.
pub fn simulate_contributions(
    snapshot: &RoundSnapshot,
    contributor: &ContributorId,
    contributions: &[HypotheticalContribution],
    settings: &DistributionSettings,
) -> Result<Simulation, Error> {
    let contributions = contributions
        .iter()
        .map(|hypothetical| {
            hypothetical_contribution(
                snapshot,
                hypothetical.campaign_id,
                contributor,
                &hypothetical.amount,
                hypothetical.token.as_deref(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let simulated_snapshot = snapshot.with_contributions(&contributions)?;

    let baseline = allocate(snapshot, settings);
    let simulated = allocate(&simulated_snapshot, settings);
    let delta = deltas(snapshot, &baseline, &simulated);
    info!(
        round_id = snapshot.id(),
        %contributor,
        contributions = contributions.len(),
        "simulated contributions"
    );

    Ok(Simulation {
        baseline: baseline.to_distribution(snapshot),
        simulated: simulated.to_distribution(&simulated_snapshot),
        delta,
    })
}

fn deltas(
    snapshot: &RoundSnapshot,
    baseline: &Allocation,
    simulated: &Allocation,
) -> Vec<CampaignDelta> {
    let decimals = snapshot.decimals();
    snapshot
        .campaigns()
        .iter()
        .zip(baseline.campaigns.iter().zip(&simulated.campaigns))
        .map(|(campaign, (before, after))| {
            let matching_delta = if after.matching >= before.matching {
                format_units(&(&after.matching - &before.matching), decimals)
            } else {
                format!(
                    "-{}",
                    format_units(&(&before.matching - &after.matching), decimals)
                )
            };
            CampaignDelta {
                campaign_id: campaign.id(),
                title: campaign.title().to_string(),
                matching_delta,
            }
        })
        .collect()
}

use super::distribution::{allocate, DistributionSettings};
use super::Error;
use num_bigint::BigUint;
use num_traits::CheckedSub;
use round_snapshot::units::{format_units, parse_units};
use round_snapshot::{
    CampaignId, Contribution, ContributionStatus, ContributorId, InvalidInput, RoundSnapshot,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a campaign would receive after a hypothetical contribution, and how
/// much of that is due to the contribution itself.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarginalMatch {
    pub estimated_match: String,
    pub marginal_match: String,
}

/// Parses a hypothetical amount into a confirmed contribution to `campaign_id`.
pub(crate) fn hypothetical_contribution(
    snapshot: &RoundSnapshot,
    campaign_id: CampaignId,
    contributor: &ContributorId,
    amount: &str,
    token: Option<&str>,
) -> Result<Contribution, Error> {
    if snapshot.campaign(campaign_id).is_none() {
        return Err(InvalidInput::UnknownCampaign(campaign_id).into());
    }
    let minor_units =
        parse_units(amount, snapshot.decimals()).map_err(|source| InvalidInput::Amount {
            context: format!("hypothetical contribution to campaign {}", campaign_id),
            source,
        })?;
    Ok(Contribution::new(
        contributor.clone(),
        campaign_id,
        minor_units,
        token.unwrap_or_else(|| snapshot.token()),
        ContributionStatus::Confirmed,
    )?)
}

/// Estimates the matching `campaign_id` would receive if `contributor` added
/// `amount` to it.
///
/// The calculation runs on a copy of `snapshot`. The marginal match is the
/// gain of the target campaign over its current matching, floored at zero.
pub fn estimate_marginal_match(
    snapshot: &RoundSnapshot,
    campaign_id: CampaignId,
    contributor: &ContributorId,
    amount: &str,
) -> Result<MarginalMatch, Error> {
    let contribution = hypothetical_contribution(snapshot, campaign_id, contributor, amount, None)?;
    let settings = DistributionSettings::default();

    let baseline = matching_of(snapshot, campaign_id, &settings);
    let simulated = matching_of(
        &snapshot.with_contributions([&contribution])?,
        campaign_id,
        &settings,
    );
    let marginal = simulated.checked_sub(&baseline).unwrap_or_default();
    debug!(
        campaign_id,
        %contributor,
        %baseline,
        %simulated,
        "estimated marginal match"
    );

    let decimals = snapshot.decimals();
    Ok(MarginalMatch {
        estimated_match: format_units(&simulated, decimals),
        marginal_match: format_units(&marginal, decimals),
    })
}

fn matching_of(
    snapshot: &RoundSnapshot,
    campaign_id: CampaignId,
    settings: &DistributionSettings,
) -> BigUint {
    allocate(snapshot, settings)
        .matching_for(campaign_id)
        .cloned()
        .unwrap_or_default()
}

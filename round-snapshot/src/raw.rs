use crate::units::{self, DEFAULT_DECIMALS};
use crate::{
    aggregate_contributions, check_decimals, same_token, AggregatedContributions, CampaignId,
    CampaignQfEntry, ConfigurationError, Contribution, ContributionStatus, ContributorId, Error,
    InvalidInput, RoundId, RoundInfo, RoundSnapshot, DEFAULT_TOKEN,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "APPROVED")]
    Approved,
    #[serde(alias = "REJECTED")]
    Rejected,
    #[serde(other)]
    Other,
}

fn default_token() -> String {
    DEFAULT_TOKEN.to_string()
}

fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}

/// A round as stored upstream, before any validation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawRound {
    pub id: RoundId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default = "default_token")]
    pub token: String,
    #[serde(alias = "tokenDecimals", default = "default_decimals")]
    pub token_decimals: u32,
    #[serde(alias = "matchingPool")]
    pub matching_pool: Decimal,
    #[serde(alias = "roundCampaigns", default)]
    pub campaigns: Vec<RawCampaign>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RawCampaign {
    pub id: CampaignId,
    #[serde(default)]
    pub title: String,
    pub status: CampaignStatus,
    #[serde(alias = "payments", default)]
    pub contributions: Vec<RawContribution>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RawContribution {
    #[serde(alias = "userId", alias = "user_id")]
    pub contributor: ContributorId,
    pub amount: String,
    #[serde(default = "default_token")]
    pub token: String,
    pub status: ContributionStatus,
}

impl RawCampaign {
    fn into_entry(self, token: &str, decimals: u32) -> Result<CampaignQfEntry, Error> {
        let RawCampaign {
            id,
            title,
            status,
            contributions,
        } = self;
        debug!(campaign_id = id, %title, records = contributions.len(), "parsing campaign");

        let mut skipped = 0;
        let mut confirmed = Vec::with_capacity(contributions.len());
        for raw in contributions {
            if raw.status != ContributionStatus::Confirmed {
                skipped += 1;
                continue;
            }
            if !same_token(&raw.token, token) {
                return Err(InvalidInput::TokenMismatch {
                    campaign_id: id,
                    expected: token.to_string(),
                    found: raw.token,
                }
                .into());
            }
            let amount = units::parse_units(&raw.amount, decimals).map_err(|source| {
                InvalidInput::Amount {
                    context: format!("contribution from {} to campaign {}", raw.contributor, id),
                    source,
                }
            })?;
            confirmed.push(Contribution::new(
                raw.contributor,
                id,
                amount,
                raw.token,
                raw.status,
            )?);
        }

        let mut aggregated: AggregatedContributions = aggregate_contributions(&confirmed);
        for _ in 0..skipped {
            aggregated.skip();
        }
        if skipped > 0 {
            warn!(campaign_id = id, skipped, "ignoring contributions that are not confirmed");
        }

        Ok(CampaignQfEntry::new(id, title, status, aggregated))
    }
}

impl RoundSnapshot {
    /// Validates an upstream round and assembles the snapshot used for matching.
    ///
    /// Only approved campaigns and confirmed contributions are retained. Fails
    /// with a configuration error when the pool is not strictly positive or no
    /// campaign is eligible, and with invalid input when the token declares
    /// unsupported decimals or a confirmed contribution carries a malformed,
    /// non-positive or foreign amount.
    pub fn from_raw_round(raw: RawRound) -> Result<Self, Error> {
        let RawRound {
            id,
            title,
            status,
            token,
            token_decimals,
            matching_pool,
            campaigns,
        } = raw;
        debug!(round_id = id, %title, %status, %matching_pool, "parsing round");

        let configuration_error = |reason| Error::Configuration {
            round_id: id,
            reason,
        };

        if matching_pool <= Decimal::ZERO {
            return Err(configuration_error(ConfigurationError::NoMatchingPool));
        }
        check_decimals(id, token_decimals)?;
        let matching_pool = units::parse_units(&matching_pool.normalize().to_string(), token_decimals)
            .map_err(|source| InvalidInput::Amount {
                context: format!("matching pool of round {}", id),
                source,
            })?;

        if campaigns.is_empty() {
            return Err(configuration_error(ConfigurationError::NoCampaigns));
        }
        let approved = campaigns
            .into_iter()
            .filter(|campaign| {
                let eligible = campaign.status == CampaignStatus::Approved;
                if !eligible {
                    warn!(
                        round_id = id,
                        campaign_id = campaign.id,
                        status = ?campaign.status,
                        "skipping campaign not approved for matching"
                    );
                }
                eligible
            })
            .collect::<Vec<_>>();
        if approved.is_empty() {
            return Err(configuration_error(ConfigurationError::NoApprovedCampaigns));
        }

        let entries = approved
            .into_iter()
            .map(|campaign| campaign.into_entry(&token, token_decimals))
            .collect::<Result<Vec<_>, _>>()?;

        RoundSnapshot::new(
            RoundInfo {
                id,
                title,
                status,
                token,
                decimals: token_decimals,
            },
            matching_pool,
            entries,
        )
    }
}

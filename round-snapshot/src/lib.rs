mod contribution;
mod raw;
mod source;
pub mod units;

#[cfg(any(test, feature = "proptest"))]
mod arbitrary;

pub use contribution::{
    aggregate_contributions, AggregatedContributions, Contribution, ContributionStatus,
    ContributorId,
};
pub use raw::{CampaignStatus, RawCampaign, RawContribution, RawRound};
pub use source::{load_round_snapshot, InMemoryRounds, JsonRoundsDir, RoundSource};

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use units::UnitsError;

pub type RoundId = u64;
pub type CampaignId = u64;

/// Token rounds are denominated in unless stated otherwise.
pub const DEFAULT_TOKEN: &str = "USDC";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Round with id {0} does not exist")]
    NotFound(RoundId),

    #[error("Round with id {round_id} {reason}")]
    Configuration {
        round_id: RoundId,
        reason: ConfigurationError,
    },

    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("could not read round data")]
    Io(#[from] std::io::Error),

    #[error("could not parse round data")]
    Json(#[from] serde_json::Error),
}

/// Why a round cannot be used for a matching calculation.
///
/// A round whose campaigns simply have not received anything yet is not a
/// configuration problem: it yields a zero distribution.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("has no campaigns")]
    NoCampaigns,
    #[error("has no campaigns approved for matching")]
    NoApprovedCampaigns,
    #[error("has no matching pool")]
    NoMatchingPool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("contributor id must not be empty")]
    EmptyContributorId,

    #[error("contribution from {contributor} to campaign {campaign_id} has a non-positive amount")]
    NonPositiveAmount {
        campaign_id: CampaignId,
        contributor: ContributorId,
    },

    #[error("invalid amount for {context}")]
    Amount {
        context: String,
        #[source]
        source: UnitsError,
    },

    #[error("contribution to campaign {campaign_id} is in {found}, the round is denominated in {expected}")]
    TokenMismatch {
        campaign_id: CampaignId,
        expected: String,
        found: String,
    },

    #[error("campaign {0} appears more than once in the round")]
    DuplicateCampaign(CampaignId),

    #[error("campaign {0} is not approved for matching")]
    IneligibleCampaign(CampaignId),

    #[error("campaign {0} is not part of the round")]
    UnknownCampaign(CampaignId),

    #[error("round {round_id} declares {decimals} token decimals, at most {max} are supported", max = units::MAX_DECIMALS)]
    UnsupportedDecimals { round_id: RoundId, decimals: u32 },

    #[error("expected round {expected}, found round {found}")]
    RoundIdMismatch { expected: RoundId, found: RoundId },
}

pub(crate) fn same_token(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

pub(crate) fn check_decimals(round_id: RoundId, decimals: u32) -> Result<(), InvalidInput> {
    if decimals > units::MAX_DECIMALS {
        return Err(InvalidInput::UnsupportedDecimals { round_id, decimals });
    }
    Ok(())
}

/// Descriptive attributes of a round, carried along unchanged by calculations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundInfo {
    pub id: RoundId,
    pub title: String,
    pub status: String,
    pub token: String,
    pub decimals: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignQfEntry {
    id: CampaignId,
    title: String,
    status: CampaignStatus,
    contributions: AggregatedContributions,
}

impl CampaignQfEntry {
    pub fn new(
        id: CampaignId,
        title: impl Into<String>,
        status: CampaignStatus,
        contributions: AggregatedContributions,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            status,
            contributions,
        }
    }

    pub fn approved(
        id: CampaignId,
        title: impl Into<String>,
        contributions: AggregatedContributions,
    ) -> Self {
        Self::new(id, title, CampaignStatus::Approved, contributions)
    }

    pub fn id(&self) -> CampaignId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub fn contributions(&self) -> &AggregatedContributions {
        &self.contributions
    }

    pub fn unique_contributors(&self) -> usize {
        self.contributions.unique_contributors()
    }

    pub fn total_contributions(&self) -> usize {
        self.contributions.total_contributions()
    }
}

/// Point in time view of a round: its matching pool and the aggregated
/// contributions of every campaign eligible for matching.
///
/// A snapshot is an immutable value. It always holds at least one campaign and
/// a strictly positive matching pool, so every calculation over it is defined.
/// What-if scenarios are built with [`RoundSnapshot::with_contributions`],
/// which returns a modified copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSnapshot {
    info: RoundInfo,
    matching_pool: BigUint,
    campaigns: Vec<CampaignQfEntry>,
}

impl RoundSnapshot {
    pub fn new(
        info: RoundInfo,
        matching_pool: BigUint,
        campaigns: Vec<CampaignQfEntry>,
    ) -> Result<Self, Error> {
        let configuration_error = |reason| Error::Configuration {
            round_id: info.id,
            reason,
        };
        if matching_pool.is_zero() {
            return Err(configuration_error(ConfigurationError::NoMatchingPool));
        }
        if campaigns.is_empty() {
            return Err(configuration_error(ConfigurationError::NoCampaigns));
        }
        check_decimals(info.id, info.decimals)?;

        let mut seen = HashSet::new();
        for campaign in &campaigns {
            if campaign.status != CampaignStatus::Approved {
                return Err(InvalidInput::IneligibleCampaign(campaign.id).into());
            }
            if !seen.insert(campaign.id) {
                return Err(InvalidInput::DuplicateCampaign(campaign.id).into());
            }
        }

        Ok(Self {
            info,
            matching_pool,
            campaigns,
        })
    }

    pub fn info(&self) -> &RoundInfo {
        &self.info
    }

    pub fn id(&self) -> RoundId {
        self.info.id
    }

    pub fn token(&self) -> &str {
        &self.info.token
    }

    pub fn decimals(&self) -> u32 {
        self.info.decimals
    }

    /// Matching pool in minor units.
    pub fn matching_pool(&self) -> &BigUint {
        &self.matching_pool
    }

    pub fn campaigns(&self) -> &[CampaignQfEntry] {
        &self.campaigns
    }

    pub fn campaign(&self, id: CampaignId) -> Option<&CampaignQfEntry> {
        self.campaigns.iter().find(|campaign| campaign.id == id)
    }

    /// Returns a copy of this snapshot with `contributions` folded into the
    /// contributors' totals, as if they had been confirmed already.
    pub fn with_contributions<'a, I>(&self, contributions: I) -> Result<RoundSnapshot, Error>
    where
        I: IntoIterator<Item = &'a Contribution>,
    {
        let mut copy = self.clone();
        for contribution in contributions {
            if !same_token(contribution.token(), copy.token()) {
                return Err(InvalidInput::TokenMismatch {
                    campaign_id: contribution.campaign_id(),
                    expected: copy.info.token.clone(),
                    found: contribution.token().to_string(),
                }
                .into());
            }
            let campaign = copy
                .campaigns
                .iter_mut()
                .find(|campaign| campaign.id == contribution.campaign_id())
                .ok_or(InvalidInput::UnknownCampaign(contribution.campaign_id()))?;
            campaign.contributions.record(contribution);
        }
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> RoundInfo {
        RoundInfo {
            id: 1,
            title: "Round".to_string(),
            status: "active".to_string(),
            token: DEFAULT_TOKEN.to_string(),
            decimals: units::DEFAULT_DECIMALS,
        }
    }

    fn contribution(contributor: u64, campaign_id: CampaignId, amount: u64) -> Contribution {
        Contribution::new(
            contributor.into(),
            campaign_id,
            BigUint::from(amount),
            DEFAULT_TOKEN,
            ContributionStatus::Confirmed,
        )
        .unwrap()
    }

    fn campaign(id: CampaignId, contributions: &[Contribution]) -> CampaignQfEntry {
        CampaignQfEntry::approved(id, format!("Campaign {}", id), aggregate_contributions(contributions))
    }

    #[test]
    fn rejects_empty_pool_first() {
        let err = RoundSnapshot::new(info(), BigUint::zero(), vec![]).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration {
                round_id: 1,
                reason: ConfigurationError::NoMatchingPool
            }
        ));
        assert_eq!(err.to_string(), "Round with id 1 has no matching pool");
    }

    #[test]
    fn rejects_no_campaigns() {
        let err = RoundSnapshot::new(info(), BigUint::from(10u8), vec![]).unwrap_err();
        assert_eq!(err.to_string(), "Round with id 1 has no campaigns");
    }

    #[test]
    fn rejects_duplicate_and_ineligible_campaigns() {
        let err = RoundSnapshot::new(
            info(),
            BigUint::from(10u8),
            vec![campaign(1, &[]), campaign(1, &[])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::DuplicateCampaign(1))
        ));

        let rejected = CampaignQfEntry::new(2, "Rejected", CampaignStatus::Rejected, Default::default());
        let err = RoundSnapshot::new(info(), BigUint::from(10u8), vec![rejected]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::IneligibleCampaign(2))
        ));
    }

    #[test]
    fn rejects_unsupported_decimals() {
        let mut info = info();
        info.decimals = units::MAX_DECIMALS + 1;
        let err = RoundSnapshot::new(info, BigUint::from(10u8), vec![campaign(1, &[])]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::UnsupportedDecimals {
                round_id: 1,
                decimals: 256
            })
        ));
    }

    #[test]
    fn with_contributions_leaves_original_untouched() {
        let snapshot = RoundSnapshot::new(
            info(),
            BigUint::from(1_000u32),
            vec![campaign(1, &[contribution(1, 1, 100)]), campaign(2, &[])],
        )
        .unwrap();
        let before = snapshot.clone();

        let updated = snapshot
            .with_contributions(&[contribution(1, 1, 44), contribution(9, 2, 1)])
            .unwrap();

        assert_eq!(snapshot, before);
        let first = updated.campaign(1).unwrap();
        assert_eq!(
            first.contributions().amount_for(&ContributorId::Numeric(1)),
            Some(&BigUint::from(144u8))
        );
        assert_eq!(first.unique_contributors(), 1);
        assert_eq!(first.total_contributions(), 2);
        assert_eq!(updated.campaign(2).unwrap().unique_contributors(), 1);
    }

    #[test]
    fn with_contributions_rejects_unknown_campaign_and_foreign_token() {
        let snapshot =
            RoundSnapshot::new(info(), BigUint::from(1_000u32), vec![campaign(1, &[])]).unwrap();

        let err = snapshot
            .with_contributions(&[contribution(1, 7, 10)])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::UnknownCampaign(7))
        ));

        let dai = Contribution::new(
            1u64.into(),
            1,
            BigUint::from(10u8),
            "DAI",
            ContributionStatus::Confirmed,
        )
        .unwrap();
        let err = snapshot.with_contributions(&[dai]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::TokenMismatch { campaign_id: 1, .. })
        ));
    }
}

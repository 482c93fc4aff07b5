use crate::{CampaignId, InvalidInput};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Opaque, stable identity of a donor.
///
/// Upstream records use both numeric user ids and string ids. A string holding
/// the canonical form of an integer is the same contributor as that integer.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(untagged)]
pub enum ContributorId {
    Numeric(u64),
    Named(String),
}

impl ContributorId {
    fn is_empty(&self) -> bool {
        matches!(self, ContributorId::Named(name) if name.trim().is_empty())
    }
}

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributorId::Numeric(id) => write!(f, "{}", id),
            ContributorId::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for ContributorId {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(InvalidInput::EmptyContributorId);
        }
        Ok(s.parse::<u64>()
            .ok()
            .filter(|id| id.to_string() == s)
            .map(ContributorId::Numeric)
            .unwrap_or_else(|| ContributorId::Named(s.to_string())))
    }
}

impl From<u64> for ContributorId {
    fn from(id: u64) -> Self {
        ContributorId::Numeric(id)
    }
}

impl<'de> Deserialize<'de> for ContributorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContributorIdVisitor;

        impl<'de> de::Visitor<'de> for ContributorIdVisitor {
            type Value = ContributorId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer or a non-empty string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ContributorId::Numeric(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(ContributorId::Numeric)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ContributorIdVisitor)
    }
}

/// Payment state of a contribution. Only `Confirmed` participates in matching;
/// states this crate does not know about are read as `Other`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    Confirmed,
    Confirming,
    Pending,
    Failed,
    Refunded,
    #[serde(other)]
    Other,
}

/// A single donation to a campaign, amount in minor units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contribution {
    contributor: ContributorId,
    campaign_id: CampaignId,
    amount: BigUint,
    token: String,
    status: ContributionStatus,
}

impl Contribution {
    pub fn new(
        contributor: ContributorId,
        campaign_id: CampaignId,
        amount: BigUint,
        token: impl Into<String>,
        status: ContributionStatus,
    ) -> Result<Self, InvalidInput> {
        if contributor.is_empty() {
            return Err(InvalidInput::EmptyContributorId);
        }
        if amount.is_zero() {
            return Err(InvalidInput::NonPositiveAmount {
                campaign_id,
                contributor,
            });
        }
        Ok(Self {
            contributor,
            campaign_id,
            amount,
            token: token.into(),
            status,
        })
    }

    pub fn contributor(&self) -> &ContributorId {
        &self.contributor
    }

    pub fn campaign_id(&self) -> CampaignId {
        self.campaign_id
    }

    pub fn amount(&self) -> &BigUint {
        &self.amount
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn status(&self) -> ContributionStatus {
        self.status
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == ContributionStatus::Confirmed
    }
}

/// Per contributor cumulative amounts of a single campaign.
///
/// Contributors are kept ordered so that anything derived from the totals is
/// reproducible regardless of the order contributions were read in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregatedContributions {
    by_contributor: BTreeMap<ContributorId, BigUint>,
    contributions: usize,
    skipped: usize,
}

impl AggregatedContributions {
    pub fn unique_contributors(&self) -> usize {
        self.by_contributor.len()
    }

    /// Number of confirmed contributions folded into the totals.
    pub fn total_contributions(&self) -> usize {
        self.contributions
    }

    /// Number of records left out because they were not confirmed.
    pub fn skipped_contributions(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.by_contributor.is_empty()
    }

    pub fn amount_for(&self, contributor: &ContributorId) -> Option<&BigUint> {
        self.by_contributor.get(contributor)
    }

    pub fn amounts(&self) -> impl Iterator<Item = &BigUint> {
        self.by_contributor.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContributorId, &BigUint)> {
        self.by_contributor.iter()
    }

    pub fn total_amount(&self) -> BigUint {
        self.amounts().sum()
    }

    pub(crate) fn record(&mut self, contribution: &Contribution) {
        if contribution.is_confirmed() {
            *self
                .by_contributor
                .entry(contribution.contributor.clone())
                .or_default() += &contribution.amount;
            self.contributions += 1;
        } else {
            self.skip();
        }
    }

    pub(crate) fn skip(&mut self) {
        self.skipped += 1;
    }
}

/// Collapses the contributions of one campaign into one total per contributor.
/// Records that are not confirmed are counted but do not participate.
pub fn aggregate_contributions<'a, I>(contributions: I) -> AggregatedContributions
where
    I: IntoIterator<Item = &'a Contribution>,
{
    let aggregated = contributions
        .into_iter()
        .fold(AggregatedContributions::default(), |mut acc, contribution| {
            acc.record(contribution);
            acc
        });
    debug!(
        contributions = aggregated.contributions,
        unique_contributors = aggregated.unique_contributors(),
        skipped = aggregated.skipped,
        "aggregated contributions"
    );
    aggregated
}

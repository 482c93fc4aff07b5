//! Quadratic funding matching over a [`RoundSnapshot`](crate::snapshot::RoundSnapshot).
//!
//! All arithmetic happens on integer minor units. Decimal strings appear only
//! in the serializable results handed back to callers.

mod distribution;
mod marginal;
mod score;
mod simulation;
mod sqrt;

#[cfg(test)]
mod test_utils;

pub use distribution::{
    allocate, compute_distribution, compute_distribution_with, Allocation, CampaignAllocation,
    CampaignMatching, Distribution, DistributionSettings,
};
pub use marginal::{estimate_marginal_match, MarginalMatch};
pub use round_snapshot::Error;
pub use score::{campaign_score, qf_score};
pub use simulation::{simulate_contributions, CampaignDelta, HypotheticalContribution, Simulation};
pub use sqrt::isqrt;

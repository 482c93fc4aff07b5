use super::sqrt::isqrt;
use num_bigint::BigUint;
use round_snapshot::CampaignQfEntry;

/// Quadratic funding score: the square of the sum of the square roots of
/// every contributor's total. No contributors means a score of zero.
pub fn qf_score<'a, I>(amounts: I) -> BigUint
where
    I: IntoIterator<Item = &'a BigUint>,
{
    let root_sum: BigUint = amounts.into_iter().map(isqrt).sum();
    &root_sum * &root_sum
}

pub fn campaign_score(campaign: &CampaignQfEntry) -> BigUint {
    qf_score(campaign.contributions().amounts())
}

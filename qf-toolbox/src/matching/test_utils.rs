use num_bigint::BigUint;
use round_snapshot::{
    aggregate_contributions, CampaignId, CampaignQfEntry, Contribution, ContributionStatus,
    RoundInfo, RoundSnapshot, DEFAULT_TOKEN,
};

pub fn contribution(contributor: u64, campaign_id: CampaignId, amount: u64) -> Contribution {
    Contribution::new(
        contributor.into(),
        campaign_id,
        BigUint::from(amount),
        DEFAULT_TOKEN,
        ContributionStatus::Confirmed,
    )
    .unwrap()
}

/// Campaign with one confirmed contribution per `(contributor, amount)` pair.
pub fn campaign(id: CampaignId, contributions: &[(u64, u64)]) -> CampaignQfEntry {
    let contributions = contributions
        .iter()
        .map(|(contributor, amount)| contribution(*contributor, id, *amount))
        .collect::<Vec<_>>();
    CampaignQfEntry::approved(
        id,
        format!("Campaign {}", id),
        aggregate_contributions(&contributions),
    )
}

pub fn round(pool: u64, decimals: u32, campaigns: Vec<CampaignQfEntry>) -> RoundSnapshot {
    RoundSnapshot::new(
        RoundInfo {
            id: 1,
            title: "Test round".to_string(),
            status: "active".to_string(),
            token: DEFAULT_TOKEN.to_string(),
            decimals,
        },
        BigUint::from(pool),
        campaigns,
    )
    .unwrap()
}

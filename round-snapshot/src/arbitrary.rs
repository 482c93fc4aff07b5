use crate::{
    aggregate_contributions, CampaignId, CampaignQfEntry, Contribution,
    ContributionStatus, RoundInfo, RoundSnapshot, DEFAULT_TOKEN,
};
use num_bigint::BigUint;
use proptest::collection::vec;
use proptest::prelude::*;

const MAX_CAMPAIGNS: usize = 6;
const MAX_CONTRIBUTIONS: usize = 10;

fn campaign_entry(id: CampaignId, contributions: Vec<(u64, u64)>) -> CampaignQfEntry {
    let contributions = contributions
        .into_iter()
        .map(|(contributor, amount)| {
            Contribution::new(
                contributor.into(),
                id,
                BigUint::from(amount),
                DEFAULT_TOKEN,
                ContributionStatus::Confirmed,
            )
            .expect("generated amounts are strictly positive")
        })
        .collect::<Vec<_>>();
    CampaignQfEntry::approved(
        id,
        format!("Campaign {}", id),
        aggregate_contributions(&contributions),
    )
}

impl Arbitrary for CampaignQfEntry {
    type Parameters = CampaignId;
    type Strategy = BoxedStrategy<CampaignQfEntry>;

    fn arbitrary_with(id: Self::Parameters) -> Self::Strategy {
        vec((0..8u64, 1..=1_000_000_000_000u64), 0..MAX_CONTRIBUTIONS)
            .prop_map(move |contributions| campaign_entry(id, contributions))
            .boxed()
    }
}

impl Arbitrary for RoundSnapshot {
    type Parameters = ();
    type Strategy = BoxedStrategy<RoundSnapshot>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            1..=MAX_CAMPAIGNS,
            1..=1_000_000_000_000_000u64,
            0..=18u32,
        )
            .prop_flat_map(|(n_campaigns, pool, decimals)| {
                let campaigns = (0..n_campaigns as CampaignId)
                    .map(|id| any_with::<CampaignQfEntry>(id + 1))
                    .collect::<Vec<_>>();
                (campaigns, Just(pool), Just(decimals))
            })
            .prop_map(|(campaigns, pool, decimals)| {
                let info = RoundInfo {
                    id: 1,
                    title: "Generated round".to_string(),
                    status: "active".to_string(),
                    token: DEFAULT_TOKEN.to_string(),
                    decimals,
                };
                RoundSnapshot::new(info, BigUint::from(pool), campaigns)
                    .expect("generated rounds have a pool and distinct approved campaigns")
            })
            .boxed()
    }
}

use super::common::Common;
use color_eyre::Report;
use qf_toolbox::matching::estimate_marginal_match;
use qf_toolbox::snapshot::{CampaignId, ContributorId};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct EstimateMatch {
    #[structopt(flatten)]
    common: Common,

    /// Campaign receiving the hypothetical contribution
    #[structopt(long)]
    campaign_id: CampaignId,

    /// Contributor making it, a numeric user id or any other identifier
    #[structopt(long)]
    contributor: ContributorId,

    /// Decimal amount in the round's token, e.g. `12.5`
    #[structopt(long)]
    amount: String,
}

impl EstimateMatch {
    pub fn exec(self) -> Result<(), Report> {
        let snapshot = self.common.load_snapshot()?;
        let estimate =
            estimate_marginal_match(&snapshot, self.campaign_id, &self.contributor, &self.amount)?;
        self.common.write_json(&estimate)
    }
}

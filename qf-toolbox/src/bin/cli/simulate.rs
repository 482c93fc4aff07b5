use super::common::{load_settings, Common};
use color_eyre::Report;
use qf_toolbox::matching::{simulate_contributions, HypotheticalContribution};
use qf_toolbox::snapshot::ContributorId;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct SimulateContributions {
    #[structopt(flatten)]
    common: Common,

    /// Contributor making the hypothetical contributions
    #[structopt(long)]
    contributor: ContributorId,

    /// Path to a json encoded list of `{ "campaignId", "amount", "token"? }`
    #[structopt(long)]
    contributions: PathBuf,

    /// Path to a json encoded `DistributionSettings`
    #[structopt(long)]
    settings: Option<PathBuf>,
}

impl SimulateContributions {
    pub fn exec(self) -> Result<(), Report> {
        let Self {
            common,
            contributor,
            contributions,
            settings,
        } = self;

        let settings = load_settings(settings.as_deref())?;
        let contributions: Vec<HypotheticalContribution> =
            serde_json::from_reader(BufReader::new(File::open(contributions)?))?;
        let snapshot = common.load_snapshot()?;

        let simulation = simulate_contributions(&snapshot, &contributor, &contributions, &settings)?;
        common.write_json(&simulation)
    }
}

use super::common::{load_settings, Common};
use color_eyre::Report;
use qf_toolbox::matching::compute_distribution_with;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct ComputeDistribution {
    #[structopt(flatten)]
    common: Common,

    /// Path to a json encoded `DistributionSettings`
    #[structopt(long)]
    settings: Option<PathBuf>,

    /// Truncate each allocation to this many fractional digits, overrides the settings file
    #[structopt(long)]
    precision: Option<u32>,
}

impl ComputeDistribution {
    pub fn exec(self) -> Result<(), Report> {
        let Self {
            common,
            settings,
            precision,
        } = self;

        let mut settings = load_settings(settings.as_deref())?;
        if precision.is_some() {
            settings.precision = precision;
        }
        let snapshot = common.load_snapshot()?;
        let distribution = compute_distribution_with(&snapshot, &settings);
        common.write_json(&distribution)
    }
}

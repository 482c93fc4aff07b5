mod common;
mod distribution;
mod estimate;
mod simulate;

use color_eyre::Report;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub enum Cli {
    /// Split a round's matching pool between its campaigns
    Distribution(distribution::ComputeDistribution),
    /// Estimate the matching a single extra contribution would bring
    Estimate(estimate::EstimateMatch),
    /// Compare a round's distribution with and without a set of contributions
    Simulate(simulate::SimulateContributions),
}

impl Cli {
    pub fn exec(self) -> Result<(), Report> {
        match self {
            Self::Distribution(cmd) => cmd.exec(),
            Self::Estimate(cmd) => cmd.exec(),
            Self::Simulate(cmd) => cmd.exec(),
        }
    }
}

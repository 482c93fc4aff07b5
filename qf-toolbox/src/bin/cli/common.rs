use color_eyre::Report;
use qf_toolbox::matching::DistributionSettings;
use qf_toolbox::snapshot::{load_round_snapshot, JsonRoundsDir, RoundId, RoundSnapshot};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Common {
    /// Directory holding one `round_<id>.json` file per round
    #[structopt(long)]
    pub rounds_dir: PathBuf,

    /// Round to compute
    #[structopt(long)]
    pub round_id: RoundId,

    /// Output file, stdout if omitted
    #[structopt(long)]
    pub output: Option<PathBuf>,
}

impl Common {
    pub fn load_snapshot(&self) -> Result<RoundSnapshot, Report> {
        let rounds = JsonRoundsDir::new(&self.rounds_dir);
        Ok(load_round_snapshot(&rounds, self.round_id)?)
    }

    pub fn open_output(&self) -> Result<Box<dyn Write>, Report> {
        Ok(match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(io::stdout()),
        })
    }

    pub fn write_json<T: Serialize>(&self, value: &T) -> Result<(), Report> {
        let mut writer = self.open_output()?;
        serde_json::to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<DistributionSettings, Report> {
    match path {
        Some(path) => Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?),
        None => Ok(DistributionSettings::default()),
    }
}

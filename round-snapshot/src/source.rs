use crate::{Error, InvalidInput, RawRound, RoundId, RoundSnapshot};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Somewhere upstream rounds can be read from.
pub trait RoundSource {
    /// Returns `Ok(None)` when the source knows nothing about `round_id`.
    fn raw_round(&self, round_id: RoundId) -> Result<Option<RawRound>, Error>;
}

impl<S: RoundSource + ?Sized> RoundSource for &S {
    fn raw_round(&self, round_id: RoundId) -> Result<Option<RawRound>, Error> {
        (**self).raw_round(round_id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryRounds {
    rounds: HashMap<RoundId, RawRound>,
}

impl InMemoryRounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, round: RawRound) -> Option<RawRound> {
        self.rounds.insert(round.id, round)
    }
}

impl FromIterator<RawRound> for InMemoryRounds {
    fn from_iter<T: IntoIterator<Item = RawRound>>(iter: T) -> Self {
        Self {
            rounds: iter.into_iter().map(|round| (round.id, round)).collect(),
        }
    }
}

impl RoundSource for InMemoryRounds {
    fn raw_round(&self, round_id: RoundId) -> Result<Option<RawRound>, Error> {
        Ok(self.rounds.get(&round_id).cloned())
    }
}

/// Directory of json encoded rounds, one `round_<id>.json` file per round.
#[derive(Clone, Debug)]
pub struct JsonRoundsDir {
    root: PathBuf,
}

impl JsonRoundsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn round_path(&self, round_id: RoundId) -> PathBuf {
        self.root.join(format!("round_{}.json", round_id))
    }
}

impl RoundSource for JsonRoundsDir {
    fn raw_round(&self, round_id: RoundId) -> Result<Option<RawRound>, Error> {
        let path = self.round_path(round_id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "round file not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let round: RawRound = serde_json::from_reader(BufReader::new(file))?;
        if round.id != round_id {
            return Err(InvalidInput::RoundIdMismatch {
                expected: round_id,
                found: round.id,
            }
            .into());
        }
        Ok(Some(round))
    }
}

/// Fetches a round from `source` and assembles its snapshot.
pub fn load_round_snapshot<S: RoundSource + ?Sized>(
    source: &S,
    round_id: RoundId,
) -> Result<RoundSnapshot, Error> {
    let raw = source
        .raw_round(round_id)?
        .ok_or(Error::NotFound(round_id))?;
    let snapshot = RoundSnapshot::from_raw_round(raw)?;
    info!(
        round_id,
        campaigns = snapshot.campaigns().len(),
        "loaded round snapshot"
    );
    Ok(snapshot)
}

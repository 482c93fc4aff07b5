pub mod matching;

pub use round_snapshot as snapshot;

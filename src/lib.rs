pub mod base;
pub mod config;
pub mod error;
pub mod keyboard;
pub mod notation;
pub mod signature;
pub mod stepper;
pub mod table;

pub use base::{BasePitchRecord, BaseTable, RawPitchRecord};
pub use error::*;
pub use notation::{Alteration, PentagramPosition, PitchClass};
pub use signature::{apply_key_signature, KeySignature, KeyedPitch, KeyedTable, SignatureKind};
pub use stepper::{step, Direction, Step};
pub use table::{ExpansionPolicy, OctaveSpan, PitchBound, PitchTable, PitchTableBuilder, ResolvedPitch};

/// Build a pitch table from the canonical base table.
/// This is the main entry point for the library.
///
/// `signature = None` leaves every note natural to the base table; omitted
/// bounds leave that side of the range open.
pub fn build(
    signature: Option<&KeySignature>,
    start: Option<PitchBound>,
    end: Option<PitchBound>,
) -> Result<PitchTable, PitchError> {
    PitchTableBuilder::new(BaseTable::canonical()).build(signature, start, end)
}

/// Build a pitch table from a YAML staff configuration
pub fn build_from_config(source: &str) -> Result<PitchTable, PitchError> {
    config::StaffConfig::from_yaml(source)?.build_table()
}

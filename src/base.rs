//! # Base Pitch Table
//!
//! The immutable per-octave template the engine expands from.
//!
//! ## Purpose
//! A base table lists the notated pitches of one octave: the staff position
//! and alteration of each record. The sounding pitch class and in-octave value
//! are derived from those two fields, never stored.
//!
//! The canonical table is the twelve sharp-spelled chromatic pitches
//! `C C# D D# E F F# G G# A A# B`. Custom tables can be loaded from
//! configuration through [`RawPitchRecord`].
//!
//! ## Related Modules
//! - `signature` - Steps records of a base table under a key signature
//! - `table` - Expands the (possibly stepped) table across octaves

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PitchError;
use crate::notation::{format_label, Alteration, PentagramPosition, PitchClass};

/// Template for one notated pitch within an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BasePitchRecord {
    pub position: PentagramPosition,
    pub alteration: Alteration,
}

impl BasePitchRecord {
    pub const fn new(position: PentagramPosition, alteration: Alteration) -> Self {
        Self {
            position,
            alteration,
        }
    }

    pub fn letter(&self) -> char {
        self.position.letter()
    }

    /// Semitone within the octave, from -1 (Cb) up to 12 (B#)
    pub fn value(&self) -> i8 {
        self.position.natural_semitone() + self.alteration.offset()
    }

    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::from_semitone(self.value() as i32)
    }

    /// Label of this record in the given octave
    pub fn label(&self, octave: i8) -> String {
        format_label(self.position, self.alteration, octave)
    }

    /// Name without octave, e.g. `"F#"`
    pub fn name(&self) -> String {
        format!("{}{}", self.letter(), self.alteration.symbol())
    }
}

/// Raw base record for YAML deserialization
#[derive(Deserialize, Debug, Clone)]
pub struct RawPitchRecord {
    pub letter: String,
    #[serde(default)]
    pub alteration: String,
}

impl RawPitchRecord {
    fn resolve(&self) -> Result<BasePitchRecord, PitchError> {
        let mut chars = self.letter.trim().chars();
        let position = match (chars.next(), chars.next()) {
            (Some(letter), None) => PentagramPosition::from_letter(letter),
            _ => None,
        }
        .ok_or_else(|| PitchError::UnknownLetter(self.letter.clone()))?;
        let alteration = Alteration::parse(&self.alteration)?;
        Ok(BasePitchRecord::new(position, alteration))
    }
}

const CANONICAL: [BasePitchRecord; 12] = {
    use Alteration::{Natural, Sharp};
    use PentagramPosition as P;
    [
        BasePitchRecord::new(P::C, Natural),
        BasePitchRecord::new(P::C, Sharp),
        BasePitchRecord::new(P::D, Natural),
        BasePitchRecord::new(P::D, Sharp),
        BasePitchRecord::new(P::E, Natural),
        BasePitchRecord::new(P::F, Natural),
        BasePitchRecord::new(P::F, Sharp),
        BasePitchRecord::new(P::G, Natural),
        BasePitchRecord::new(P::G, Sharp),
        BasePitchRecord::new(P::A, Natural),
        BasePitchRecord::new(P::A, Sharp),
        BasePitchRecord::new(P::B, Natural),
    ]
};

/// Ordered set of base records for one octave
#[derive(Debug, Clone, PartialEq)]
pub struct BaseTable {
    records: Vec<BasePitchRecord>,
}

impl Default for BaseTable {
    fn default() -> Self {
        Self::canonical()
    }
}

impl BaseTable {
    /// The twelve sharp-spelled chromatic records
    pub fn canonical() -> Self {
        Self {
            records: CANONICAL.to_vec(),
        }
    }

    /// Build a table from arbitrary records.
    ///
    /// Records are sorted into canonical order (by value, then position).
    /// Duplicate records, double alterations and empty tables are rejected.
    pub fn from_records(mut records: Vec<BasePitchRecord>) -> Result<Self, PitchError> {
        if records.is_empty() {
            return Err(PitchError::EmptyBaseTable);
        }

        let mut seen = HashSet::new();
        for record in &records {
            if !record.alteration.is_single() {
                return Err(PitchError::UnknownAlteration(record.name()));
            }
            if !seen.insert(*record) {
                return Err(PitchError::DuplicateRecord(record.name()));
            }
        }

        records.sort_by_key(|r| (r.value(), r.position));
        Ok(Self { records })
    }

    /// Build a table from deserialized records
    pub fn from_raw(raw: &[RawPitchRecord]) -> Result<Self, PitchError> {
        let records = raw
            .iter()
            .map(RawPitchRecord::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(records)
    }

    pub fn records(&self) -> &[BasePitchRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &BasePitchRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_position(&self, position: PentagramPosition) -> bool {
        self.records.iter().any(|r| r.position == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_table_covers_every_pitch_class_once() {
        let table = BaseTable::canonical();
        assert_eq!(table.len(), 12);
        for (i, record) in table.iter().enumerate() {
            assert_eq!(record.pitch_class().ordinal() as usize, i);
            assert_eq!(record.value() as usize, i);
        }
        for position in PentagramPosition::ALL {
            assert!(table.has_position(position));
        }
    }

    #[test]
    fn test_record_names_and_labels() {
        let f_sharp = BasePitchRecord::new(PentagramPosition::F, Alteration::Sharp);
        assert_eq!(f_sharp.name(), "F#");
        assert_eq!(f_sharp.label(3), "F#3");
        assert_eq!(f_sharp.pitch_class(), PitchClass::FSharp);

        let c_flat = BasePitchRecord::new(PentagramPosition::C, Alteration::Flat);
        assert_eq!(c_flat.value(), -1);
        assert_eq!(c_flat.pitch_class(), PitchClass::B);
    }

    #[test]
    fn test_from_raw_sorts_records() {
        let raw = vec![
            RawPitchRecord { letter: "E".to_string(), alteration: "natural".to_string() },
            RawPitchRecord { letter: "c".to_string(), alteration: String::new() },
            RawPitchRecord { letter: "D".to_string(), alteration: "flat".to_string() },
        ];
        let table = BaseTable::from_raw(&raw).unwrap();
        let names: Vec<String> = table.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["C", "Db", "E"]);
    }

    #[test]
    fn test_from_raw_rejects_unknown_alteration() {
        let raw = vec![RawPitchRecord {
            letter: "C".to_string(),
            alteration: "double-flat".to_string(),
        }];
        assert_eq!(
            BaseTable::from_raw(&raw),
            Err(PitchError::UnknownAlteration("double-flat".to_string()))
        );
    }

    #[test]
    fn test_from_raw_rejects_unknown_letter() {
        let raw = vec![RawPitchRecord {
            letter: "H".to_string(),
            alteration: String::new(),
        }];
        assert_eq!(
            BaseTable::from_raw(&raw),
            Err(PitchError::UnknownLetter("H".to_string()))
        );
    }

    #[test]
    fn test_from_records_rejects_duplicates_and_empty() {
        let c = BasePitchRecord::new(PentagramPosition::C, Alteration::Natural);
        assert_eq!(
            BaseTable::from_records(vec![c, c]),
            Err(PitchError::DuplicateRecord("C".to_string()))
        );
        assert_eq!(BaseTable::from_records(vec![]), Err(PitchError::EmptyBaseTable));
        let f_double_sharp = BasePitchRecord::new(PentagramPosition::F, Alteration::DoubleSharp);
        assert_eq!(
            BaseTable::from_records(vec![f_double_sharp]),
            Err(PitchError::UnknownAlteration("F##".to_string()))
        );
    }
}

//! # Key Signatures
//!
//! Key signature descriptors and their application to a base table.
//!
//! ## Purpose
//! A key signature alters specific pentagram positions for a whole session.
//! Applying it to a [`BaseTable`] steps every record on an affected position
//! one key up (sharps) or down (flats). The written record stays the same, so
//! the label on the staff is unchanged; only the sounding key moves.
//!
//! ## Accidental Order
//! - Sharps: F C G D A E B
//! - Flats: B E A D G C F
//!
//! ## Example
//! ```rust
//! use staff_pitches::{apply_key_signature, BaseTable, KeySignature, PitchClass};
//!
//! let g_major: KeySignature = "G".parse().unwrap();
//! let keyed = apply_key_signature(&BaseTable::canonical(), Some(&g_major));
//!
//! // The F line now sounds F#
//! let f = keyed.iter().find(|k| k.written.name() == "F").unwrap();
//! assert_eq!(f.sounding(), PitchClass::FSharp);
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::str::FromStr;

use crate::base::{BasePitchRecord, BaseTable};
use crate::error::PitchError;
use crate::notation::{Alteration, PentagramPosition, PitchClass};
use crate::stepper::{step, Direction};

/// Whether a signature raises or lowers its positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignatureKind {
    Sharps,
    Flats,
}

impl SignatureKind {
    pub fn direction(self) -> Direction {
        match self {
            SignatureKind::Sharps => Direction::Forward,
            SignatureKind::Flats => Direction::Backward,
        }
    }

    pub fn prefers_flats(self) -> bool {
        self == SignatureKind::Flats
    }
}

/// Order in which sharps are added to a key signature
pub const SHARP_ORDER: [PentagramPosition; 7] = [
    PentagramPosition::F,
    PentagramPosition::C,
    PentagramPosition::G,
    PentagramPosition::D,
    PentagramPosition::A,
    PentagramPosition::E,
    PentagramPosition::B,
];

/// Order in which flats are added to a key signature
pub const FLAT_ORDER: [PentagramPosition; 7] = [
    PentagramPosition::B,
    PentagramPosition::E,
    PentagramPosition::A,
    PentagramPosition::D,
    PentagramPosition::G,
    PentagramPosition::C,
    PentagramPosition::F,
];

/// Key signature: the pentagram positions it alters, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySignature {
    pub kind: SignatureKind,
    pub positions: Vec<PentagramPosition>,
}

impl KeySignature {
    pub fn new(kind: SignatureKind, positions: Vec<PentagramPosition>) -> Self {
        Self { kind, positions }
    }

    /// Build a standard signature from its position on the circle of fifths.
    /// Positive = sharps, negative = flats, zero = no accidentals.
    pub fn from_fifths(fifths: i8) -> Result<Self, PitchError> {
        if !(-7..=7).contains(&fifths) {
            return Err(PitchError::UnknownKeySignature(format!(
                "{} fifths (expected -7 to 7)",
                fifths
            )));
        }
        let count = fifths.unsigned_abs() as usize;
        let signature = if fifths >= 0 {
            Self::new(SignatureKind::Sharps, SHARP_ORDER[..count].to_vec())
        } else {
            Self::new(SignatureKind::Flats, FLAT_ORDER[..count].to_vec())
        };
        Ok(signature)
    }

    /// Signed accidental count (sharps positive, flats negative)
    pub fn fifths(&self) -> i8 {
        let count = self.positions.len() as i8;
        match self.kind {
            SignatureKind::Sharps => count,
            SignatureKind::Flats => -count,
        }
    }

    pub fn affects(&self, position: PentagramPosition) -> bool {
        self.positions.contains(&position)
    }
}

impl FromStr for KeySignature {
    type Err = PitchError;

    /// Parse a key signature string like "G", "D", "F", "Bb", "Eb", etc.
    /// Also supports minor keys: "Am", "Dm", "Ebm", etc.
    /// Also supports sharp/flat count notation: "#", "##", ... or "bb", "bbb", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unknown = || PitchError::UnknownKeySignature(s.to_string());

        if !trimmed.is_empty() && trimmed.chars().all(|c| c == '#') {
            return match trimmed.len() {
                count @ 1..=7 => Self::from_fifths(count as i8),
                _ => Err(unknown()),
            };
        }

        // "b" alone is B major, so flat counts start at two
        if trimmed.len() >= 2 && trimmed.chars().all(|c| c == 'b') {
            return match trimmed.len() {
                count @ 2..=7 => Self::from_fifths(-(count as i8)),
                _ => Err(unknown()),
            };
        }

        if trimmed.ends_with('m') && trimmed.len() > 1 {
            let key_name = &trimmed[..trimmed.len() - 1];
            let fifths = match key_name {
                "A" => 0,
                "E" => 1,
                "B" => 2,
                "F#" | "Fs" => 3,
                "C#" | "Cs" => 4,
                "G#" | "Gs" => 5,
                "D#" | "Ds" => 6,
                "A#" | "As" => 7,
                "D" => -1,
                "G" => -2,
                "C" => -3,
                "F" => -4,
                "Bb" | "Bf" => -5,
                "Eb" | "Ef" => -6,
                "Ab" | "Af" => -7,
                _ => return Err(unknown()),
            };
            return Self::from_fifths(fifths);
        }

        let fifths = match trimmed {
            "C" => 0,
            "G" => 1,
            "D" => 2,
            "A" => 3,
            "E" => 4,
            "B" | "b" => 5,
            "F#" | "Fs" => 6,
            "C#" | "Cs" => 7,
            "F" => -1,
            "Bb" | "Bf" => -2,
            "Eb" | "Ef" => -3,
            "Ab" | "Af" => -4,
            "Db" | "Df" => -5,
            "Gb" | "Gf" => -6,
            "Cb" | "Cf" => -7,
            _ => return Err(unknown()),
        };
        Self::from_fifths(fifths)
    }
}

/// A base record after key-signature application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyedPitch {
    /// The record as written on the staff
    pub written: BasePitchRecord,
    /// Sounding semitone within the written octave (-2..=13)
    pub value: i8,
}

impl KeyedPitch {
    fn unaltered(written: BasePitchRecord) -> Self {
        Self {
            written,
            value: written.value(),
        }
    }

    /// The key that sounds when this record is played
    pub fn sounding(&self) -> PitchClass {
        PitchClass::from_semitone(self.value as i32)
    }

    pub fn is_altered(&self) -> bool {
        self.value != self.written.value()
    }

    /// Written alteration combined with the signature's accidental.
    ///
    /// Together with the written position this always spells the sounding
    /// key: F under sharps is `Sharp`, C under flats is `Flat` (Cb), F# under
    /// sharps is `DoubleSharp`.
    pub fn alteration(&self) -> Alteration {
        let delta = self.value - self.written.value();
        Alteration::from_offset(self.written.alteration.offset() + delta)
    }
}

/// Base table with a key signature applied, in the same order as the base
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTable {
    pitches: Vec<KeyedPitch>,
    kind: Option<SignatureKind>,
}

impl KeyedTable {
    pub fn iter(&self) -> impl Iterator<Item = &KeyedPitch> {
        self.pitches.iter()
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Signature kind that produced this table, if any
    pub fn kind(&self) -> Option<SignatureKind> {
        self.kind
    }

    /// Smallest sounding value in the table
    pub fn min_value(&self) -> i8 {
        self.pitches.iter().map(|p| p.value).min().unwrap_or(0)
    }
}

/// Apply a key signature to a base table.
///
/// Every record whose position the signature lists is stepped once, wrapping
/// at B/C. Positions missing from the base table are skipped with a warning.
/// `None` leaves every record unaltered. The base table is not modified.
pub fn apply_key_signature(base: &BaseTable, signature: Option<&KeySignature>) -> KeyedTable {
    let Some(signature) = signature else {
        return KeyedTable {
            pitches: base.iter().copied().map(KeyedPitch::unaltered).collect(),
            kind: None,
        };
    };

    let mut affected = HashSet::new();
    for position in &signature.positions {
        if !base.has_position(*position) {
            log::warn!(
                "key signature alters position {} which is not in the base table; skipping",
                position
            );
            continue;
        }
        if !affected.insert(*position) {
            log::debug!("position {} listed twice in key signature; applying once", position);
        }
    }

    let direction = signature.kind.direction();
    let pitches = base
        .iter()
        .map(|record| {
            if !affected.contains(&record.position) {
                return KeyedPitch::unaltered(*record);
            }
            let stepped = step(record.pitch_class(), direction);
            let keyed = KeyedPitch {
                written: *record,
                value: record.value() + stepped.delta,
            };
            debug_assert_eq!(keyed.sounding(), stepped.pitch_class);
            keyed
        })
        .collect();

    KeyedTable {
        pitches,
        kind: Some(signature.kind),
    }
}

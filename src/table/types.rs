use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

use crate::base::BasePitchRecord;
use crate::error::PitchError;
use crate::notation::{label_value, Alteration, PentagramPosition, PitchClass};

/// Inclusive range bound, expressed as an absolute value so it never depends
/// on the key signature in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PitchBound {
    pub absolute_value: i32,
}

impl PitchBound {
    pub fn new(absolute_value: i32) -> Self {
        Self { absolute_value }
    }

    /// Bound at the unmodified value of a label (`"C4"` -> 60)
    pub fn from_label(label: &str) -> Result<Self, PitchError> {
        label_value(label).map(Self::new)
    }
}

impl From<&ResolvedPitch> for PitchBound {
    fn from(pitch: &ResolvedPitch) -> Self {
        Self::new(pitch.absolute_value)
    }
}

/// One fully resolved pitch of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPitch {
    /// Written label, e.g. `"F4"` (unchanged by the key signature)
    pub label: String,
    /// The record as written on the staff
    pub written: BasePitchRecord,
    /// Key that sounds (and must be pressed) for this note
    pub pitch_class: PitchClass,
    /// Written alteration plus the signature's accidental; with `position` it
    /// spells `pitch_class`
    pub alteration: Alteration,
    /// Staff position the note is drawn on
    pub position: PentagramPosition,
    /// Written octave
    pub octave: i8,
    /// MIDI value of the sounding pitch (C4 = 60)
    pub absolute_value: i32,
}

impl ResolvedPitch {
    /// Whether the key signature changed the sounding pitch of this note
    pub fn is_altered(&self) -> bool {
        self.pitch_class != self.written.pitch_class()
    }
}

/// Label -> resolved pitch lookup, iterated in generation order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PitchTable {
    pitches: Vec<ResolvedPitch>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PitchTable {
    pub(crate) fn insert(&mut self, pitch: ResolvedPitch) -> Result<(), PitchError> {
        if self.index.contains_key(&pitch.label) {
            return Err(PitchError::DuplicateLabel(pitch.label));
        }
        self.index.insert(pitch.label.clone(), self.pitches.len());
        self.pitches.push(pitch);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&ResolvedPitch> {
        self.index.get(label).map(|&i| &self.pitches[i])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Pitches in generation order (octave, then canonical record order)
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPitch> {
        self.pitches.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.pitches.iter().map(|p| p.label.as_str())
    }

    /// Pitch with the smallest absolute value (first generated on ties)
    pub fn lowest(&self) -> Option<&ResolvedPitch> {
        self.pitches.iter().min_by_key(|p| p.absolute_value)
    }

    /// Pitch with the largest absolute value (last generated on ties)
    pub fn highest(&self) -> Option<&ResolvedPitch> {
        self.pitches.iter().max_by_key(|p| p.absolute_value)
    }

    /// Draw a uniformly random pitch for the next note on the staff
    pub fn random_pitch<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ResolvedPitch> {
        self.pitches.choose(rng)
    }
}

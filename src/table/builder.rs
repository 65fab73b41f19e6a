use crate::base::BaseTable;
use crate::error::PitchError;
use crate::notation::{
    normalize_label, octave_base, parse_label, CEILING_LABEL, HIGHEST_OCTAVE, LOWEST_OCTAVE,
};
use crate::signature::{apply_key_signature, KeyedPitch, KeySignature};

use super::types::{PitchBound, PitchTable, ResolvedPitch};

/// Inclusive range of octaves to expand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctaveSpan {
    lowest: i8,
    highest: i8,
}

impl Default for OctaveSpan {
    fn default() -> Self {
        Self::full()
    }
}

impl OctaveSpan {
    /// Every supported octave, -1 through 9
    pub fn full() -> Self {
        Self {
            lowest: LOWEST_OCTAVE,
            highest: HIGHEST_OCTAVE,
        }
    }

    pub fn new(lowest: i8, highest: i8) -> Result<Self, PitchError> {
        let invalid = |message: &str| PitchError::InvalidOctaveSpan {
            lowest,
            highest,
            message: message.to_string(),
        };
        if lowest > highest {
            return Err(invalid("lowest octave is above highest octave"));
        }
        if lowest < LOWEST_OCTAVE || highest > HIGHEST_OCTAVE {
            return Err(invalid("octaves must lie within -1..=9"));
        }
        Ok(Self { lowest, highest })
    }

    pub fn lowest(&self) -> i8 {
        self.lowest
    }

    pub fn highest(&self) -> i8 {
        self.highest
    }

    pub fn iter(&self) -> impl Iterator<Item = i8> {
        self.lowest..=self.highest
    }
}

/// Guards that bound the expansion at both ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionPolicy {
    /// Leave out the first record of the lowest octave
    pub skip_floor_entry: bool,
    /// Stop after this label, inclusive. Compared in canonical spelling, so
    /// `"g9"` and `"G9"` are the same ceiling.
    pub ceiling: Option<String>,
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self {
            skip_floor_entry: true,
            ceiling: Some(CEILING_LABEL.to_string()),
        }
    }
}

impl ExpansionPolicy {
    /// No floor skip and no ceiling: every configured octave is expanded in full
    pub fn unbounded() -> Self {
        Self {
            skip_floor_entry: false,
            ceiling: None,
        }
    }

    /// Replace the ceiling, normalizing its spelling
    pub fn with_ceiling(mut self, label: &str) -> Result<Self, PitchError> {
        self.ceiling = Some(normalize_label(label)?);
        Ok(self)
    }

    fn is_floor_entry(&self, span: &OctaveSpan, octave: i8, index: usize) -> bool {
        self.skip_floor_entry && octave == span.lowest && index == 0
    }
}

/// Builds pitch tables from an immutable base table.
///
/// The builder can be reused: each `build` call applies the key signature to
/// a fresh copy of the base records.
#[derive(Debug, Clone, Default)]
pub struct PitchTableBuilder {
    base: BaseTable,
    octaves: OctaveSpan,
    policy: ExpansionPolicy,
}

impl PitchTableBuilder {
    pub fn new(base: BaseTable) -> Self {
        Self {
            base,
            octaves: OctaveSpan::default(),
            policy: ExpansionPolicy::default(),
        }
    }

    pub fn with_octaves(mut self, octaves: OctaveSpan) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base(&self) -> &BaseTable {
        &self.base
    }

    pub fn octaves(&self) -> OctaveSpan {
        self.octaves
    }

    pub fn policy(&self) -> &ExpansionPolicy {
        &self.policy
    }

    /// Whether expansion can produce `label` at all: its octave is in the span
    /// and the base table holds a record with the same position and alteration.
    /// The floor skip and range are not considered.
    pub fn generates_label(&self, label: &str) -> bool {
        let Ok((position, alteration, octave)) = parse_label(label) else {
            return false;
        };
        self.octaves.iter().any(|o| o == octave)
            && self
                .base
                .iter()
                .any(|r| r.position == position && r.alteration == alteration)
    }

    /// Build the pitch table for a key signature and an inclusive range.
    ///
    /// Either bound may be omitted to leave that side open. Candidates outside
    /// the range never enter the table. Fails with `InvalidRange` when `start`
    /// lies above `end`.
    pub fn build(
        &self,
        signature: Option<&KeySignature>,
        start: Option<PitchBound>,
        end: Option<PitchBound>,
    ) -> Result<PitchTable, PitchError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(PitchError::InvalidRange {
                    start: start.absolute_value,
                    end: end.absolute_value,
                });
            }
        }

        let ceiling = self
            .policy
            .ceiling
            .as_deref()
            .map(normalize_label)
            .transpose()?;
        if let Some(label) = &ceiling {
            if !self.generates_label(label) {
                log::warn!("ceiling {} is never generated; expansion is not bounded by it", label);
            }
        }

        let keyed = apply_key_signature(&self.base, signature);
        let in_range = |value: i32| {
            start.map_or(true, |s| value >= s.absolute_value)
                && end.map_or(true, |e| value <= e.absolute_value)
        };

        let mut table = PitchTable::default();

        'octaves: for octave in self.octaves.iter() {
            let base_value = octave_base(octave);

            // Later octaves only sound higher
            if let Some(end) = end {
                if base_value + keyed.min_value() as i32 > end.absolute_value {
                    log::trace!("octave {} lies above the range; stopping", octave);
                    break;
                }
            }

            for (index, keyed_pitch) in keyed.iter().enumerate() {
                let pitch = resolve(keyed_pitch, octave, base_value);
                // A skipped floor entry still counts as reaching the ceiling
                let reached_ceiling = ceiling.as_deref() == Some(pitch.label.as_str());

                if self.policy.is_floor_entry(&self.octaves, octave, index) {
                    log::trace!("skipping floor entry {}", pitch.label);
                } else if in_range(pitch.absolute_value) {
                    table.insert(pitch)?;
                }

                if reached_ceiling {
                    log::trace!("reached ceiling label; stopping");
                    break 'octaves;
                }
            }
        }

        log::debug!(
            "built pitch table with {} pitches (signature: {:?})",
            table.len(),
            signature.map(KeySignature::fifths)
        );
        Ok(table)
    }
}

fn resolve(keyed: &KeyedPitch, octave: i8, base_value: i32) -> ResolvedPitch {
    ResolvedPitch {
        label: keyed.written.label(octave),
        written: keyed.written,
        pitch_class: keyed.sounding(),
        alteration: keyed.alteration(),
        position: keyed.written.position,
        octave,
        absolute_value: base_value + keyed.value as i32,
    }
}

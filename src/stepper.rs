//! Cyclic stepping around the 12 pitch classes.
//!
//! `step` moves one key clockwise (forward) or counter-clockwise (backward)
//! and reports the semitone delta. The pitch class wraps at B/C while the delta
//! stays signed, so the caller can carry the octave crossing into the value.

use crate::notation::{PitchClass, PITCHES_PER_OCTAVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Result of one step around the pitch-class cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub pitch_class: PitchClass,
    /// +1 or -1
    pub delta: i8,
    /// True when the step wrapped B -> C or C -> B
    pub crosses_octave: bool,
}

/// Step `pitch_class` one key in `direction`
pub fn step(pitch_class: PitchClass, direction: Direction) -> Step {
    let delta = direction.sign();
    let raw = pitch_class.ordinal() as i32 + delta as i32;
    Step {
        pitch_class: PitchClass::from_semitone(raw),
        delta,
        crosses_octave: !(0..PITCHES_PER_OCTAVE).contains(&raw),
    }
}

//! Computer-keyboard input for guessing notes.
//!
//! The bottom letter row plays the white keys and the row above it the black
//! keys, laid out like one piano octave:
//!
//! ```text
//!  S D   G H J
//! Z X C V B N M
//! ```

use crate::notation::PitchClass;
use crate::table::ResolvedPitch;

/// Key -> pitch class bindings, one octave from C
pub const KEY_BINDINGS: [(char, PitchClass); 12] = [
    ('Z', PitchClass::C),
    ('S', PitchClass::CSharp),
    ('X', PitchClass::D),
    ('D', PitchClass::DSharp),
    ('C', PitchClass::E),
    ('V', PitchClass::F),
    ('G', PitchClass::FSharp),
    ('B', PitchClass::G),
    ('H', PitchClass::GSharp),
    ('N', PitchClass::A),
    ('J', PitchClass::ASharp),
    ('M', PitchClass::B),
];

/// Pitch class bound to a computer key (case-insensitive)
pub fn pitch_class_for_key(key: char) -> Option<PitchClass> {
    let key = key.to_ascii_uppercase();
    KEY_BINDINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, pitch_class)| *pitch_class)
}

pub fn key_for_pitch_class(pitch_class: PitchClass) -> char {
    KEY_BINDINGS[pitch_class.ordinal() as usize].0
}

/// Whether pressing `pressed` answers `target`.
///
/// The guess is checked against the sounding key, so a note written on the F
/// line under a one-sharp signature expects F#.
pub fn is_correct_guess(target: &ResolvedPitch, pressed: PitchClass) -> bool {
    target.pitch_class == pressed
}

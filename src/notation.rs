//! # Notation Types
//!
//! This module defines the pitch vocabulary shared by every stage of the engine.
//!
//! ## Type Overview
//! ```text
//! PentagramPosition (C D E F G A B)   staff line/space, independent of accidental
//! Alteration        (natural, #, b)   how a position is notated
//! PitchClass        (C, C#, ... B)    the sounding key within an octave
//! ```
//!
//! ## Key Concepts
//!
//! ### Labels
//! A label is `"{letter}{symbol}{octave}"`, e.g. `C4`, `F#3`, `Bb-1`. The octave
//! below octave 0 is rendered `-1`; `_1` is also accepted when parsing.
//!
//! ### Absolute Values
//! Absolute values follow the MIDI convention: `C-1 = 0`, `C4 = 60`, `G9 = 127`.
//! `label_value` computes the value of a label without any key signature, which
//! is how range bounds are expressed.
//!
//! ### Octave System
//! Octaves always reset at C. A flatted C (`Cb4`) sounds as B3 and a sharped B
//! (`B#4`) sounds as C5, so in-octave values run from -1 to 12.

use serde::Serialize;
use std::fmt;

use crate::error::PitchError;

/// Lowest octave a label can carry (MIDI octave "-1").
pub const LOWEST_OCTAVE: i8 = -1;

/// Highest octave a label can carry.
pub const HIGHEST_OCTAVE: i8 = 9;

/// Number of pitch classes per octave.
pub const PITCHES_PER_OCTAVE: i32 = 12;

/// Highest MIDI pitch, the default stop sentinel of the expansion.
pub const CEILING_LABEL: &str = "G9";

/// Staff line/space identity of a note, independent of its alteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PentagramPosition {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PentagramPosition {
    pub const ALL: [PentagramPosition; 7] = [
        PentagramPosition::C,
        PentagramPosition::D,
        PentagramPosition::E,
        PentagramPosition::F,
        PentagramPosition::G,
        PentagramPosition::A,
        PentagramPosition::B,
    ];

    /// Semitone of the natural note on this position, counted from C
    pub fn natural_semitone(self) -> i8 {
        match self {
            PentagramPosition::C => 0,
            PentagramPosition::D => 2,
            PentagramPosition::E => 4,
            PentagramPosition::F => 5,
            PentagramPosition::G => 7,
            PentagramPosition::A => 9,
            PentagramPosition::B => 11,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PentagramPosition::C => 'C',
            PentagramPosition::D => 'D',
            PentagramPosition::E => 'E',
            PentagramPosition::F => 'F',
            PentagramPosition::G => 'G',
            PentagramPosition::A => 'A',
            PentagramPosition::B => 'B',
        }
    }

    /// Parse a staff letter (case-insensitive)
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'C' => Some(PentagramPosition::C),
            'D' => Some(PentagramPosition::D),
            'E' => Some(PentagramPosition::E),
            'F' => Some(PentagramPosition::F),
            'G' => Some(PentagramPosition::G),
            'A' => Some(PentagramPosition::A),
            'B' => Some(PentagramPosition::B),
            _ => None,
        }
    }
}

impl fmt::Display for PentagramPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// How a pentagram position is notated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum Alteration {
    #[default]
    Natural,
    Sharp,
    Flat,
    /// Only produced by a key signature on an already-sharp record
    DoubleSharp,
    /// Only produced by a key signature on an already-flat record
    DoubleFlat,
}

impl Alteration {
    /// Semitone offset applied to the natural note
    pub fn offset(self) -> i8 {
        match self {
            Alteration::Natural => 0,
            Alteration::Sharp => 1,
            Alteration::Flat => -1,
            Alteration::DoubleSharp => 2,
            Alteration::DoubleFlat => -2,
        }
    }

    /// Alteration with the given semitone offset (saturates at double sharp/flat)
    pub fn from_offset(offset: i8) -> Self {
        match offset {
            i8::MIN..=-2 => Alteration::DoubleFlat,
            -1 => Alteration::Flat,
            0 => Alteration::Natural,
            1 => Alteration::Sharp,
            2..=i8::MAX => Alteration::DoubleSharp,
        }
    }

    /// Whether a base table record may carry this alteration
    pub fn is_single(self) -> bool {
        matches!(self, Alteration::Natural | Alteration::Sharp | Alteration::Flat)
    }

    /// Symbol used inside labels
    pub fn symbol(self) -> &'static str {
        match self {
            Alteration::Natural => "",
            Alteration::Sharp => "#",
            Alteration::Flat => "b",
            Alteration::DoubleSharp => "##",
            Alteration::DoubleFlat => "bb",
        }
    }

    /// Parse an alteration name or symbol.
    ///
    /// Anything else is a configuration defect and fails with
    /// `PitchError::UnknownAlteration`.
    pub fn parse(text: &str) -> Result<Self, PitchError> {
        match text.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "natural" => Ok(Alteration::Natural),
            "#" | "s" | "sharp" => Ok(Alteration::Sharp),
            "b" | "f" | "flat" => Ok(Alteration::Flat),
            _ => Err(PitchError::UnknownAlteration(text.to_string())),
        }
    }
}

/// One of the 12 chromatic keys within an octave.
///
/// The variant is the only source of both the ordinal and the display
/// spelling, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Position within the octave, 0 (C) to 11 (B)
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Pitch class of any signed semitone count (wraps in both directions)
    pub fn from_semitone(semitone: i32) -> Self {
        Self::ALL[semitone.rem_euclid(PITCHES_PER_OCTAVE) as usize]
    }

    /// Spell this pitch class as a position and alteration.
    ///
    /// Black keys use the sharp above the lower neighbour when `prefer_flat` is
    /// false, the flat below the upper neighbour otherwise.
    pub fn spelling(self, prefer_flat: bool) -> (PentagramPosition, Alteration) {
        use PentagramPosition as P;
        match self {
            PitchClass::C => (P::C, Alteration::Natural),
            PitchClass::CSharp if prefer_flat => (P::D, Alteration::Flat),
            PitchClass::CSharp => (P::C, Alteration::Sharp),
            PitchClass::D => (P::D, Alteration::Natural),
            PitchClass::DSharp if prefer_flat => (P::E, Alteration::Flat),
            PitchClass::DSharp => (P::D, Alteration::Sharp),
            PitchClass::E => (P::E, Alteration::Natural),
            PitchClass::F => (P::F, Alteration::Natural),
            PitchClass::FSharp if prefer_flat => (P::G, Alteration::Flat),
            PitchClass::FSharp => (P::F, Alteration::Sharp),
            PitchClass::G => (P::G, Alteration::Natural),
            PitchClass::GSharp if prefer_flat => (P::A, Alteration::Flat),
            PitchClass::GSharp => (P::G, Alteration::Sharp),
            PitchClass::A => (P::A, Alteration::Natural),
            PitchClass::ASharp if prefer_flat => (P::B, Alteration::Flat),
            PitchClass::ASharp => (P::A, Alteration::Sharp),
            PitchClass::B => (P::B, Alteration::Natural),
        }
    }

    /// Display name such as `"F#"` or `"Gb"`
    pub fn name(self, prefer_flat: bool) -> String {
        let (position, alteration) = self.spelling(prefer_flat);
        format!("{}{}", position.letter(), alteration.symbol())
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(false))
    }
}

/// Format a label such as `"C4"`, `"F#3"` or `"Bb-1"`
pub fn format_label(position: PentagramPosition, alteration: Alteration, octave: i8) -> String {
    format!("{}{}{}", position.letter(), alteration.symbol(), octave)
}

/// Absolute value of the first C of an octave (`C-1 = 0`, `C4 = 60`)
pub fn octave_base(octave: i8) -> i32 {
    (octave as i32 - LOWEST_OCTAVE as i32) * PITCHES_PER_OCTAVE
}

/// Split a label into position, alteration and octave
pub fn parse_label(label: &str) -> Result<(PentagramPosition, Alteration, i8), PitchError> {
    let invalid = |message: String| PitchError::InvalidLabel {
        label: label.to_string(),
        message,
    };

    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    let letter = chars.next().ok_or_else(|| invalid("empty label".to_string()))?;
    let position = PentagramPosition::from_letter(letter)
        .ok_or_else(|| invalid(format!("unknown letter '{}'", letter)))?;

    let rest = chars.as_str();
    let (alteration, octave_text) = [
        ("##", Alteration::DoubleSharp),
        ("#", Alteration::Sharp),
        ("bb", Alteration::DoubleFlat),
        ("b", Alteration::Flat),
    ]
    .iter()
    .find_map(|(symbol, alteration)| rest.strip_prefix(*symbol).map(|tail| (*alteration, tail)))
    .unwrap_or((Alteration::Natural, rest));

    if octave_text.starts_with('+') {
        return Err(invalid(format!("invalid octave '{}'", octave_text)));
    }

    // "_1" is the legacy spelling of octave -1
    let octave_text = if octave_text == "_1" { "-1" } else { octave_text };
    let octave: i8 = octave_text
        .parse()
        .map_err(|_| invalid(format!("invalid octave '{}'", octave_text)))?;

    if !(LOWEST_OCTAVE..=HIGHEST_OCTAVE).contains(&octave) {
        return Err(invalid(format!(
            "octave {} outside {}..={}",
            octave, LOWEST_OCTAVE, HIGHEST_OCTAVE
        )));
    }

    Ok((position, alteration, octave))
}

/// Absolute value of a label with no key signature applied.
///
/// # Example
/// ```
/// use staff_pitches::notation::label_value;
///
/// assert_eq!(label_value("C4").unwrap(), 60);
/// assert_eq!(label_value("Gb4").unwrap(), label_value("F#4").unwrap());
/// assert_eq!(label_value("C_1").unwrap(), 0);
/// ```
/// Canonical spelling of a label: `"g9"` -> `"G9"`, `"C_1"` -> `"C-1"`
pub fn normalize_label(label: &str) -> Result<String, PitchError> {
    let (position, alteration, octave) = parse_label(label)?;
    Ok(format_label(position, alteration, octave))
}

pub fn label_value(label: &str) -> Result<i32, PitchError> {
    let (position, alteration, octave) = parse_label(label)?;
    Ok(octave_base(octave) + (position.natural_semitone() + alteration.offset()) as i32)
}

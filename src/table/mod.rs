//! # Pitch Table Module
//!
//! Expand a key-signed base table across octaves into a lookup table of
//! resolved pitches.
//!
//! ## Purpose
//! The staff layer builds one [`PitchTable`] per session configuration
//! (key signature + pitch range) and keeps it for the whole session:
//! 1. **Random draws** - pick the next note to slide across the staff
//! 2. **Guess checking** - compare the pressed key with the note's sounding key
//! 3. **Rendering** - place the note on its written staff position
//!
//! ## Sub-modules
//! - `types` - ResolvedPitch, PitchTable, PitchBound definitions
//! - `builder` - Octave expansion, range filter and the two expansion guards
//!
//! ## Example
//! ```rust
//! use staff_pitches::{build, PitchBound};
//!
//! let start = PitchBound::from_label("C4").unwrap();
//! let end = PitchBound::from_label("C5").unwrap();
//! let table = build(None, Some(start), Some(end)).unwrap();
//!
//! assert_eq!(table.len(), 13);
//! assert_eq!(table.get("C4").unwrap().absolute_value, 60);
//! assert_eq!(table.get("C5").unwrap().absolute_value, 72);
//! ```
//!
//! ## Expansion Guards
//!
//! ### Floor Entry
//! The first record of the lowest octave (`C-1` with the canonical table) is
//! left out: it lies below any instrument's practical floor, and under a flat
//! signature its value would be negative.
//!
//! ### Ceiling Label
//! Expansion ends at the ceiling label (`G9`, MIDI 127) inclusive, even when
//! more octaves are configured.
//!
//! ## Related Modules
//! - `signature` - Produces the keyed table this module expands
//! - `keyboard` - Checks guesses against resolved pitches

mod builder;
mod types;

#[cfg(test)]
mod tests;

pub use builder::{ExpansionPolicy, OctaveSpan, PitchTableBuilder};
pub use types::{PitchBound, PitchTable, ResolvedPitch};

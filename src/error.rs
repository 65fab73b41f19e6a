//! # Error Types
//!
//! This module defines all error types for the pitch table engine.
//!
//! ## Error Types
//! - `UnknownAlteration` / `UnknownLetter` - malformed base table records (fatal)
//! - `UnknownKeySignature` - key signature text or fifths count not recognised
//! - `InvalidLabel` - a pitch label like `"F#4"` could not be parsed
//! - `InvalidRange` - start bound lies above the end bound
//! - `InvalidOctaveSpan` - octave span outside the supported octaves
//! - `DuplicateRecord` / `DuplicateLabel` / `EmptyBaseTable` - inconsistent base tables
//! - `ConfigError` - invalid YAML staff configuration
//!
//! ## Usage
//! ```rust
//! use staff_pitches::{build, PitchBound, PitchError};
//!
//! let start = PitchBound::new(72);
//! let end = PitchBound::new(60);
//! match build(None, Some(start), Some(end)) {
//!     Err(PitchError::InvalidRange { start, end }) => assert!(start > end),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PitchError {
    /// A base record carries an alteration that is not natural, sharp or flat.
    ///
    /// # Example
    /// ```
    /// # use staff_pitches::PitchError;
    /// let err = PitchError::UnknownAlteration("double-sharp".to_string());
    /// assert_eq!(err.to_string(), "Unknown alteration 'double-sharp' in base table");
    /// ```
    #[error("Unknown alteration '{0}' in base table")]
    UnknownAlteration(String),

    /// A base record names a staff letter outside A-G.
    #[error("Unknown letter '{0}' in base table")]
    UnknownLetter(String),

    #[error("Unknown key signature: {0}")]
    UnknownKeySignature(String),

    /// A pitch label could not be parsed.
    ///
    /// # Example
    /// ```
    /// # use staff_pitches::PitchError;
    /// let err = PitchError::InvalidLabel {
    ///     label: "H4".to_string(),
    ///     message: "unknown letter 'H'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid pitch label 'H4': unknown letter 'H'");
    /// ```
    #[error("Invalid pitch label '{label}': {message}")]
    InvalidLabel { label: String, message: String },

    /// Range bounds are reversed.
    #[error("Invalid range: start value {start} is above end value {end}")]
    InvalidRange { start: i32, end: i32 },

    #[error("Invalid octave span {lowest}..={highest}: {message}")]
    InvalidOctaveSpan {
        lowest: i8,
        highest: i8,
        message: String,
    },

    #[error("Duplicate base record '{0}'")]
    DuplicateRecord(String),

    #[error("Duplicate pitch label '{0}' generated")]
    DuplicateLabel(String),

    #[error("Base table has no records")]
    EmptyBaseTable,

    /// Invalid staff configuration.
    ///
    /// # Example
    /// ```
    /// # use staff_pitches::PitchError;
    /// let err = PitchError::ConfigError("lowest must be a pitch label".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: lowest must be a pitch label");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

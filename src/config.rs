//! # Staff Configuration
//!
//! YAML description of one staff session: key signature, pitch range and
//! (optionally) octave span, expansion guards and a custom base table.
//!
//! ## Format
//! ```yaml
//! key-signature: G
//! lowest: C4
//! highest: C5
//! lowest-octave: 2
//! highest-octave: 6
//! skip-floor-entry: true
//! ceiling: G9
//! base-table:
//!   - letter: C
//!   - letter: F
//!     alteration: sharp
//! ```
//! Every key is optional. Missing keys fall back to the canonical base table,
//! octaves -1..=9, no key signature and an open range.
//!
//! ## Example
//! ```rust
//! use staff_pitches::config::StaffConfig;
//!
//! let config = StaffConfig::from_yaml("key-signature: D\nlowest: C4\nhighest: C5\n").unwrap();
//! let table = config.build_table().unwrap();
//! assert_eq!(table.get("C4").unwrap().absolute_value, 61);
//! ```

use serde::Deserialize;

use crate::base::{BaseTable, RawPitchRecord};
use crate::error::PitchError;
use crate::notation::{normalize_label, CEILING_LABEL};
use crate::signature::KeySignature;
use crate::table::{ExpansionPolicy, OctaveSpan, PitchBound, PitchTable, PitchTableBuilder};

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawStaffConfig {
    pub key_signature: Option<String>,
    pub lowest: Option<String>,
    pub highest: Option<String>,
    pub lowest_octave: Option<i8>,
    pub highest_octave: Option<i8>,
    pub skip_floor_entry: Option<bool>,
    pub ceiling: Option<String>,
    pub base_table: Option<Vec<RawPitchRecord>>,
}

/// Resolved staff configuration
#[derive(Debug, Clone, Default)]
pub struct StaffConfig {
    pub signature: Option<KeySignature>,
    pub start: Option<PitchBound>,
    pub end: Option<PitchBound>,
    pub builder: PitchTableBuilder,
}

impl StaffConfig {
    pub fn from_yaml(source: &str) -> Result<Self, PitchError> {
        let raw: RawStaffConfig = if source.trim().is_empty() {
            RawStaffConfig::default()
        } else {
            serde_yaml::from_str(source).map_err(|e| PitchError::ConfigError(e.to_string()))?
        };
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawStaffConfig) -> Result<Self, PitchError> {
        let signature = raw
            .key_signature
            .as_deref()
            .map(str::parse::<KeySignature>)
            .transpose()?;
        let start = raw.lowest.as_deref().map(PitchBound::from_label).transpose()?;
        let end = raw.highest.as_deref().map(PitchBound::from_label).transpose()?;

        let base = match &raw.base_table {
            Some(records) => BaseTable::from_raw(records)?,
            None => BaseTable::canonical(),
        };

        let full = OctaveSpan::full();
        let octaves = OctaveSpan::new(
            raw.lowest_octave.unwrap_or(full.lowest()),
            raw.highest_octave.unwrap_or(full.highest()),
        )?;

        let builder = PitchTableBuilder::new(base).with_octaves(octaves);
        let ceiling = match raw.ceiling {
            Some(label) if label.eq_ignore_ascii_case("none") => None,
            Some(label) => {
                let label = normalize_label(&label)?;
                if !builder.generates_label(&label) {
                    return Err(PitchError::ConfigError(format!(
                        "ceiling {} is not generated by the base table within octaves {}..={}",
                        label,
                        octaves.lowest(),
                        octaves.highest()
                    )));
                }
                Some(label)
            }
            // The default ceiling only applies where it can be reached
            None => Some(CEILING_LABEL.to_string())
                .filter(|label| builder.generates_label(label)),
        };
        let builder = builder.with_policy(ExpansionPolicy {
            skip_floor_entry: raw.skip_floor_entry.unwrap_or(true),
            ceiling,
        });

        Ok(Self {
            signature,
            start,
            end,
            builder,
        })
    }

    /// Build the pitch table this configuration describes
    pub fn build_table(&self) -> Result<PitchTable, PitchError> {
        self.builder
            .build(self.signature.as_ref(), self.start, self.end)
    }
}

//! Shared ECG vocabulary.
//!
//! Closed sets of names that appear on the wire and inside the rule engine:
//! - [`Lead`]: the 12 standard leads plus the optional posterior leads V7–V9
//! - [`MorphologyMarker`]: categorical QRS morphology evidence, each tied to one lead
//! - [`Sex`]: the only demographic input, used by the Cornell voltage criterion
//!
//! Parsing is strict. Names must match their canonical spelling exactly; there is no case folding
//! or alias resolution, so a typo is rejected rather than silently mapped to a different lead.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing vocabulary names.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VocabularyError {
    /// The input is not one of the recognised lead names
    #[error("unknown lead name: {0}")]
    UnknownLead(String),
    /// The input is not one of the recognised morphology markers
    #[error("unknown QRS morphology marker: {0}")]
    UnknownMarker(String),
}

/// An ECG recording viewpoint.
///
/// Declaration order is the conventional reporting order (limb leads, then precordial leads), and
/// the derived `Ord` follows it, so ordered maps keyed by `Lead` iterate the way an ECG is read.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lead {
    I,
    II,
    III,
    AVR,
    AVL,
    AVF,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
}

impl Lead {
    /// The 12 standard leads.
    pub const STANDARD: [Lead; 12] = [
        Lead::I,
        Lead::II,
        Lead::III,
        Lead::AVR,
        Lead::AVL,
        Lead::AVF,
        Lead::V1,
        Lead::V2,
        Lead::V3,
        Lead::V4,
        Lead::V5,
        Lead::V6,
    ];

    /// Posterior leads, only present when a posterior recording was made.
    pub const POSTERIOR: [Lead; 3] = [Lead::V7, Lead::V8, Lead::V9];

    /// Returns the canonical name of the lead, as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Lead::I => "I",
            Lead::II => "II",
            Lead::III => "III",
            Lead::AVR => "aVR",
            Lead::AVL => "aVL",
            Lead::AVF => "aVF",
            Lead::V1 => "V1",
            Lead::V2 => "V2",
            Lead::V3 => "V3",
            Lead::V4 => "V4",
            Lead::V5 => "V5",
            Lead::V6 => "V6",
            Lead::V7 => "V7",
            Lead::V8 => "V8",
            Lead::V9 => "V9",
        }
    }

    /// Parses a canonical lead name.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::UnknownLead`] if `input` is not an exact canonical name.
    pub fn parse(input: &str) -> Result<Self, VocabularyError> {
        Lead::STANDARD
            .iter()
            .chain(Lead::POSTERIOR.iter())
            .copied()
            .find(|lead| lead.as_str() == input)
            .ok_or_else(|| VocabularyError::UnknownLead(input.to_owned()))
    }

    /// Whether this is a chest (V-series) lead.
    pub fn is_precordial(self) -> bool {
        self >= Lead::V1
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lead {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lead::parse(s)
    }
}

impl serde::Serialize for Lead {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Lead {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Lead::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Categorical QRS morphology evidence.
///
/// Markers are produced upstream by whoever reads the waveform. The engine only checks which
/// markers are present; it never inspects voltages to derive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MorphologyMarker {
    /// rsR' (M-shaped) complex in V1.
    RsrPrimeV1,
    /// Broad dominant R wave in V1.
    BroadRV1,
    /// Wide, slurred terminal S wave in lead I.
    WideTerminalSI,
    /// Wide, slurred terminal S wave in V6.
    WideTerminalSV6,
    /// Broad, notched (M-shaped) R wave in lead I.
    BroadNotchedRI,
    /// Broad, notched R wave in V6.
    BroadNotchedRV6,
    /// Septal Q wave absent in lead I.
    AbsentQI,
    /// Septal Q wave absent in V6.
    AbsentQV6,
    /// Widened QRS without a bundle-branch configuration.
    NonspecificWidening,
}

impl MorphologyMarker {
    pub const ALL: [MorphologyMarker; 9] = [
        MorphologyMarker::RsrPrimeV1,
        MorphologyMarker::BroadRV1,
        MorphologyMarker::WideTerminalSI,
        MorphologyMarker::WideTerminalSV6,
        MorphologyMarker::BroadNotchedRI,
        MorphologyMarker::BroadNotchedRV6,
        MorphologyMarker::AbsentQI,
        MorphologyMarker::AbsentQV6,
        MorphologyMarker::NonspecificWidening,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MorphologyMarker::RsrPrimeV1 => "rsR_pattern_V1",
            MorphologyMarker::BroadRV1 => "broad_R_V1",
            MorphologyMarker::WideTerminalSI => "wide_terminal_S_I",
            MorphologyMarker::WideTerminalSV6 => "wide_terminal_S_V6",
            MorphologyMarker::BroadNotchedRI => "broad_notched_R_I",
            MorphologyMarker::BroadNotchedRV6 => "broad_notched_R_V6",
            MorphologyMarker::AbsentQI => "absent_Q_I",
            MorphologyMarker::AbsentQV6 => "absent_Q_V6",
            MorphologyMarker::NonspecificWidening => "nonspecific_QRS_widening",
        }
    }

    /// Parses a canonical marker name.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::UnknownMarker`] if `input` is not an exact canonical name.
    pub fn parse(input: &str) -> Result<Self, VocabularyError> {
        MorphologyMarker::ALL
            .iter()
            .copied()
            .find(|marker| marker.as_str() == input)
            .ok_or_else(|| VocabularyError::UnknownMarker(input.to_owned()))
    }
}

impl fmt::Display for MorphologyMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MorphologyMarker {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MorphologyMarker::parse(s)
    }
}

impl serde::Serialize for MorphologyMarker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for MorphologyMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MorphologyMarker::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Patient sex, as required by the sex-specific Cornell voltage limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

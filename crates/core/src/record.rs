//! ECG parameter records.
//!
//! Two representations exist:
//! - [`RawEcgRecord`]: the strict wire model, exactly as received (string lead names, optional
//!   scalars). It carries no guarantees beyond "it parsed".
//! - [`EcgParameterRecord`]: the validated domain record. It can only be obtained through
//!   [`crate::validation::validate`], so every classifier may rely on its invariants:
//!   lead names are known, mandatory fields are present, and every number is finite and in range.
//!
//! Sparse lead maps stay sparse. A lead missing from `st_deviation` or an amplitude map means
//! "not measured" and is never read as 0 mV.

use ecg_types::{Lead, MorphologyMarker, Sex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Wire types
// ============================================================================

/// Wire representation of an ECG parameter record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEcgRecord {
    /// Signed ST deviation per lead, in millivolts.
    #[serde(default)]
    pub st_deviation: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qrs_duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_interval_ms: Option<RawPrInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_bpm: Option<f64>,
    #[serde(default)]
    pub rr_intervals_ms: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_wave_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qrs_count: Option<u32>,
    /// R wave amplitude per lead, in millivolts.
    #[serde(default)]
    pub r_amplitude: BTreeMap<String, f64>,
    /// S wave depth per lead, in millivolts (magnitude).
    #[serde(default)]
    pub s_amplitude: BTreeMap<String, f64>,
    #[serde(default)]
    pub qrs_morphology_markers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_axis_deviation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_wave_presence: Option<bool>,
}

/// Wire form of the PR interval: a single constant value, or one entry per P wave where `null`
/// marks a P wave that was not followed by a QRS complex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrInterval {
    Constant(f64),
    PerBeat(Vec<Option<f64>>),
}

// ============================================================================
// Domain types
// ============================================================================

/// One P wave in a per-beat PR sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrBeat {
    /// The P wave conducted, with this PR interval in milliseconds.
    Conducted(f64),
    /// The P wave was not followed by a QRS complex.
    Dropped,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PrInterval {
    /// The same PR interval for every conducted beat.
    Constant(f64),
    PerBeat(Vec<PrBeat>),
}

impl PrInterval {
    /// PR values of the conducted beats, in order.
    pub fn conducted(&self) -> Vec<f64> {
        match self {
            PrInterval::Constant(pr) => vec![*pr],
            PrInterval::PerBeat(beats) => beats
                .iter()
                .filter_map(|beat| match beat {
                    PrBeat::Conducted(pr) => Some(*pr),
                    PrBeat::Dropped => None,
                })
                .collect(),
        }
    }
}

/// Validated ECG parameter record.
#[derive(Clone, Debug, PartialEq)]
pub struct EcgParameterRecord {
    pub(crate) st_deviation: BTreeMap<Lead, f64>,
    pub(crate) qrs_duration_ms: Option<f64>,
    pub(crate) pr_interval: PrInterval,
    pub(crate) heart_rate_bpm: f64,
    pub(crate) rr_intervals_ms: Vec<f64>,
    pub(crate) p_wave_count: u32,
    pub(crate) qrs_count: u32,
    pub(crate) r_amplitude: BTreeMap<Lead, f64>,
    pub(crate) s_amplitude: BTreeMap<Lead, f64>,
    pub(crate) qrs_morphology_markers: BTreeSet<MorphologyMarker>,
    pub(crate) sex: Option<Sex>,
    pub(crate) right_axis_deviation: Option<bool>,
    pub(crate) p_wave_presence: Option<bool>,
}

impl EcgParameterRecord {
    pub fn st_deviation(&self) -> &BTreeMap<Lead, f64> {
        &self.st_deviation
    }

    pub fn qrs_duration_ms(&self) -> Option<f64> {
        self.qrs_duration_ms
    }

    pub fn pr_interval(&self) -> &PrInterval {
        &self.pr_interval
    }

    pub fn heart_rate_bpm(&self) -> f64 {
        self.heart_rate_bpm
    }

    pub fn rr_intervals_ms(&self) -> &[f64] {
        &self.rr_intervals_ms
    }

    pub fn p_wave_count(&self) -> u32 {
        self.p_wave_count
    }

    pub fn qrs_count(&self) -> u32 {
        self.qrs_count
    }

    pub fn r_amplitude(&self, lead: Lead) -> Option<f64> {
        self.r_amplitude.get(&lead).copied()
    }

    pub fn s_amplitude(&self, lead: Lead) -> Option<f64> {
        self.s_amplitude.get(&lead).copied()
    }

    pub fn has_marker(&self, marker: MorphologyMarker) -> bool {
        self.qrs_morphology_markers.contains(&marker)
    }

    pub fn qrs_morphology_markers(&self) -> &BTreeSet<MorphologyMarker> {
        &self.qrs_morphology_markers
    }

    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    pub fn right_axis_deviation(&self) -> Option<bool> {
        self.right_axis_deviation
    }

    pub fn p_wave_presence(&self) -> Option<bool> {
        self.p_wave_presence
    }
}

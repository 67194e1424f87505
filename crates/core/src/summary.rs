//! Diagnostic summary and result aggregation.
//!
//! The summary is a value object: it is built once from the five classifier outputs and never
//! mutated afterwards. Serialisation matches the external contract consumed by presentation
//! layers:
//!
//! ```json
//! {
//!   "st_analysis": {"st_elevation": true, "localization": {"region": "Anterior", "leads": ["V1","V2","V3"], "max_st_elev": 0.4}, "st_depression": true},
//!   "av_conduction": {"p_waves": 5, "qrs_complexes": 5, "missing_beats": 0, "classification": "Normal conduction"},
//!   "conduction_abnormality": "IVCD",
//!   "hypertrophy": "LVH",
//!   "rhythm": "Normal sinus rhythm"
//! }
//! ```

use crate::{EcgError, EcgResult};
use ecg_types::Lead;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anatomical wall region an ST elevation localizes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StRegion {
    Anterior,
    Inferior,
    Lateral,
    Posterior,
    None,
}

/// Where an ST elevation was localized.
///
/// `leads` follows the region table order. `max_st_elev` is `None` (serialised as `null`) when no
/// region qualified, so "not localized" is never confused with a measured 0 mV.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    pub region: StRegion,
    pub leads: Vec<Lead>,
    pub max_st_elev: Option<f64>,
}

impl Localization {
    pub fn none() -> Self {
        Self {
            region: StRegion::None,
            leads: Vec::new(),
            max_st_elev: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StAnalysis {
    pub st_elevation: bool,
    pub localization: Localization,
    pub st_depression: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rhythm {
    #[serde(rename = "Normal sinus rhythm")]
    NormalSinus,
    #[serde(rename = "Sinus tachycardia")]
    SinusTachycardia,
    #[serde(rename = "Sinus bradycardia")]
    SinusBradycardia,
    #[serde(rename = "Atrial fibrillation")]
    AtrialFibrillation,
    #[serde(rename = "Junctional rhythm")]
    Junctional,
    #[serde(rename = "Irregular/Unclassified")]
    Unclassified,
}

impl Rhythm {
    pub fn as_str(self) -> &'static str {
        match self {
            Rhythm::NormalSinus => "Normal sinus rhythm",
            Rhythm::SinusTachycardia => "Sinus tachycardia",
            Rhythm::SinusBradycardia => "Sinus bradycardia",
            Rhythm::AtrialFibrillation => "Atrial fibrillation",
            Rhythm::Junctional => "Junctional rhythm",
            Rhythm::Unclassified => "Irregular/Unclassified",
        }
    }
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intraventricular conduction result.
///
/// `Ambiguous` reports conflicting RBBB and LBBB evidence; `Unknown` reports a record without a
/// QRS duration. Both are field states, not pipeline failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductionAbnormality {
    Normal,
    #[serde(rename = "RBBB")]
    Rbbb,
    #[serde(rename = "LBBB")]
    Lbbb,
    #[serde(rename = "IVCD")]
    Ivcd,
    Ambiguous,
    Unknown,
}

impl fmt::Display for ConductionAbnormality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConductionAbnormality::Normal => "Normal",
            ConductionAbnormality::Rbbb => "RBBB",
            ConductionAbnormality::Lbbb => "LBBB",
            ConductionAbnormality::Ivcd => "IVCD",
            ConductionAbnormality::Ambiguous => "Ambiguous",
            ConductionAbnormality::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvClassification {
    #[serde(rename = "Normal conduction")]
    Normal,
    #[serde(rename = "First-degree AV block")]
    FirstDegree,
    #[serde(rename = "Mobitz I")]
    MobitzI,
    #[serde(rename = "Mobitz II")]
    MobitzII,
    #[serde(rename = "Third-degree AV block")]
    ThirdDegree,
}

impl fmt::Display for AvClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AvClassification::Normal => "Normal conduction",
            AvClassification::FirstDegree => "First-degree AV block",
            AvClassification::MobitzI => "Mobitz I",
            AvClassification::MobitzII => "Mobitz II",
            AvClassification::ThirdDegree => "Third-degree AV block",
        };
        f.write_str(label)
    }
}

/// AV conduction counts and grade.
///
/// `pattern` (conduction ratio) is reported for Mobitz I and II, `pr_progression` (conducted PR
/// values in ms) for Mobitz I. Both are omitted from the JSON otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvConduction {
    pub p_waves: u32,
    pub qrs_complexes: u32,
    pub missing_beats: u32,
    pub classification: AvClassification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_progression: Option<Vec<f64>>,
}

/// Ventricular hypertrophy result. `Unknown` means no criterion could be evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hypertrophy {
    None,
    #[serde(rename = "LVH")]
    Lvh,
    #[serde(rename = "RVH")]
    Rvh,
    Both,
    Unknown,
}

impl fmt::Display for Hypertrophy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Hypertrophy::None => "None",
            Hypertrophy::Lvh => "LVH",
            Hypertrophy::Rvh => "RVH",
            Hypertrophy::Both => "Both",
            Hypertrophy::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// The structured diagnostic summary for one ECG.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    pub st_analysis: StAnalysis,
    pub av_conduction: AvConduction,
    pub conduction_abnormality: ConductionAbnormality,
    pub hypertrophy: Hypertrophy,
    pub rhythm: Rhythm,
}

impl DiagnosticSummary {
    /// Render the summary as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> EcgResult<String> {
        serde_json::to_string_pretty(self).map_err(EcgError::Serialization)
    }

    /// Render the summary as single-line JSON.
    pub fn to_json(&self) -> EcgResult<String> {
        serde_json::to_string(self).map_err(EcgError::Serialization)
    }
}

/// Raw outputs of the five classifiers for one record.
///
/// Only the conduction classifier can report a per-classifier failure; the others are total over
/// a validated record.
#[derive(Debug)]
pub struct ClassifierOutputs {
    pub st_analysis: StAnalysis,
    pub rhythm: Rhythm,
    pub conduction: EcgResult<ConductionAbnormality>,
    pub av_conduction: AvConduction,
    pub hypertrophy: Hypertrophy,
}

/// Merge classifier outputs into a [`DiagnosticSummary`].
///
/// Ambiguous and insufficient conduction evidence become the `Ambiguous` and `Unknown` field
/// states so the other four results are still reported. Any other failure is propagated and no
/// partial summary is built.
pub fn aggregate(outputs: ClassifierOutputs) -> EcgResult<DiagnosticSummary> {
    let conduction_abnormality = match outputs.conduction {
        Ok(conduction) => conduction,
        Err(EcgError::AmbiguousEvidence(detail)) => {
            tracing::warn!("conduction reported as ambiguous: {}", detail);
            ConductionAbnormality::Ambiguous
        }
        Err(EcgError::InsufficientData { field }) => {
            tracing::warn!("conduction reported as unknown: {} missing", field);
            ConductionAbnormality::Unknown
        }
        Err(other) => return Err(other),
    };

    Ok(DiagnosticSummary {
        st_analysis: outputs.st_analysis,
        av_conduction: outputs.av_conduction,
        conduction_abnormality,
        hypertrophy: outputs.hypertrophy,
        rhythm: outputs.rhythm,
    })
}

//! Classifier configuration.
//!
//! Every clinical threshold the rule engine applies is carried here. The configuration is resolved
//! once at process startup (defaults, optionally overridden from a YAML file) and then passed into
//! [`crate::EcgClassifier`]. Classifiers never read constants or the environment directly, so a
//! test can tune one threshold without touching the others.
//!
//! YAML overrides are partial: any omitted section or field keeps its published default.
//!
//! ```yaml
//! st:
//!   precordial_elevation_mv: 0.2
//! hypertrophy:
//!   sokolow_lyon_mv: 3.5
//! ```

use crate::constants::*;
use crate::{EcgError, EcgResult};
use serde::{Deserialize, Serialize};

/// Thresholds for the ST-segment analyzer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StConfig {
    pub limb_elevation_mv: f64,
    pub precordial_elevation_mv: f64,
    pub depression_mv: f64,
}

impl Default for StConfig {
    fn default() -> Self {
        Self {
            limb_elevation_mv: ST_ELEVATION_LIMB_MV,
            precordial_elevation_mv: ST_ELEVATION_PRECORDIAL_MV,
            depression_mv: ST_DEPRESSION_MV,
        }
    }
}

/// Thresholds for the rhythm classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RhythmConfig {
    pub bradycardia_bpm: f64,
    pub tachycardia_bpm: f64,
    pub junctional_min_bpm: f64,
    pub junctional_max_bpm: f64,
    /// RR coefficient of variation above which the rhythm counts as irregular.
    pub irregularity_cv: f64,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            bradycardia_bpm: BRADYCARDIA_BPM,
            tachycardia_bpm: TACHYCARDIA_BPM,
            junctional_min_bpm: JUNCTIONAL_MIN_BPM,
            junctional_max_bpm: JUNCTIONAL_MAX_BPM,
            irregularity_cv: RR_IRREGULARITY_CV,
        }
    }
}

/// QRS duration limits for the conduction classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConductionConfig {
    pub qrs_normal_limit_ms: f64,
    pub qrs_block_limit_ms: f64,
}

impl Default for ConductionConfig {
    fn default() -> Self {
        Self {
            qrs_normal_limit_ms: QRS_NORMAL_LIMIT_MS,
            qrs_block_limit_ms: QRS_BLOCK_LIMIT_MS,
        }
    }
}

/// PR interval limits for the AV-block grader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvConfig {
    pub first_degree_pr_ms: f64,
    pub pr_constant_tolerance_ms: f64,
}

impl Default for AvConfig {
    fn default() -> Self {
        Self {
            first_degree_pr_ms: PR_FIRST_DEGREE_LIMIT_MS,
            pr_constant_tolerance_ms: PR_CONSTANT_TOLERANCE_MS,
        }
    }
}

/// Voltage limits for the hypertrophy scorer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HypertrophyConfig {
    pub sokolow_lyon_mv: f64,
    pub cornell_male_mv: f64,
    pub cornell_female_mv: f64,
    pub rvh_r_v1_mv: f64,
    pub rvh_s_lateral_mv: f64,
}

impl Default for HypertrophyConfig {
    fn default() -> Self {
        Self {
            sokolow_lyon_mv: SOKOLOW_LYON_MV,
            cornell_male_mv: CORNELL_MALE_MV,
            cornell_female_mv: CORNELL_FEMALE_MV,
            rvh_r_v1_mv: RVH_R_V1_MV,
            rvh_s_lateral_mv: RVH_S_LATERAL_MV,
        }
    }
}

/// Full classifier configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub st: StConfig,
    pub rhythm: RhythmConfig,
    pub conduction: ConductionConfig,
    pub av: AvConfig,
    pub hypertrophy: HypertrophyConfig,
}

impl ClassifierConfig {
    /// Parse a configuration override from YAML text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`EcgError::Translation`] naming the offending path if the YAML does not match the
    /// configuration schema (including unknown keys), or [`EcgError::InvalidConfig`] if the
    /// resulting thresholds are inconsistent.
    pub fn from_yaml(yaml_text: &str) -> EcgResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let config: ClassifierConfig = serde_path_to_error::deserialize(deserializer)
            .map_err(|err| {
                let path = err.path().to_string();
                let source = err.into_inner();
                EcgError::Translation(format!(
                    "classifier configuration schema mismatch at {path}: {source}"
                ))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as YAML.
    pub fn to_yaml(&self) -> EcgResult<String> {
        serde_yaml::to_string(self).map_err(EcgError::YamlSerialization)
    }

    /// Check that every threshold is finite and positive and that paired limits are ordered.
    pub fn validate(&self) -> EcgResult<()> {
        let positive = [
            ("st.limb_elevation_mv", self.st.limb_elevation_mv),
            ("st.precordial_elevation_mv", self.st.precordial_elevation_mv),
            ("st.depression_mv", self.st.depression_mv),
            ("rhythm.bradycardia_bpm", self.rhythm.bradycardia_bpm),
            ("rhythm.tachycardia_bpm", self.rhythm.tachycardia_bpm),
            ("rhythm.junctional_min_bpm", self.rhythm.junctional_min_bpm),
            ("rhythm.junctional_max_bpm", self.rhythm.junctional_max_bpm),
            ("rhythm.irregularity_cv", self.rhythm.irregularity_cv),
            (
                "conduction.qrs_normal_limit_ms",
                self.conduction.qrs_normal_limit_ms,
            ),
            (
                "conduction.qrs_block_limit_ms",
                self.conduction.qrs_block_limit_ms,
            ),
            ("av.first_degree_pr_ms", self.av.first_degree_pr_ms),
            ("hypertrophy.sokolow_lyon_mv", self.hypertrophy.sokolow_lyon_mv),
            ("hypertrophy.cornell_male_mv", self.hypertrophy.cornell_male_mv),
            (
                "hypertrophy.cornell_female_mv",
                self.hypertrophy.cornell_female_mv,
            ),
            ("hypertrophy.rvh_r_v1_mv", self.hypertrophy.rvh_r_v1_mv),
            (
                "hypertrophy.rvh_s_lateral_mv",
                self.hypertrophy.rvh_s_lateral_mv,
            ),
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EcgError::InvalidConfig(format!(
                    "{name} must be a positive number (got {value})"
                )));
            }
        }

        let tolerance = self.av.pr_constant_tolerance_ms;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(EcgError::InvalidConfig(format!(
                "av.pr_constant_tolerance_ms must be non-negative (got {tolerance})"
            )));
        }

        if self.rhythm.bradycardia_bpm >= self.rhythm.tachycardia_bpm {
            return Err(EcgError::InvalidConfig(
                "rhythm.bradycardia_bpm must be below rhythm.tachycardia_bpm".into(),
            ));
        }
        if self.rhythm.junctional_min_bpm > self.rhythm.junctional_max_bpm {
            return Err(EcgError::InvalidConfig(
                "rhythm.junctional_min_bpm must not exceed rhythm.junctional_max_bpm".into(),
            ));
        }
        if self.conduction.qrs_normal_limit_ms > self.conduction.qrs_block_limit_ms {
            return Err(EcgError::InvalidConfig(
                "conduction.qrs_normal_limit_ms must not exceed conduction.qrs_block_limit_ms"
                    .into(),
            ));
        }

        Ok(())
    }
}

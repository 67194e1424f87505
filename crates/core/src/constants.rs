//! Constants used throughout the ECG core crate.
//!
//! Published clinical thresholds and the lead-to-region table live here as static data so they
//! can be reviewed against the literature independently of the rule code. Tunable copies of the
//! thresholds are carried by [`crate::config::ClassifierConfig`], which defaults to these values.

use crate::summary::StRegion;
use ecg_types::Lead;

/// ST elevation threshold for limb leads, in millivolts (1 mm).
pub const ST_ELEVATION_LIMB_MV: f64 = 0.1;

/// ST elevation threshold for chest leads, in millivolts.
pub const ST_ELEVATION_PRECORDIAL_MV: f64 = 0.1;

/// ST depression threshold magnitude, in millivolts.
pub const ST_DEPRESSION_MV: f64 = 0.1;

/// Upper limit of a normal QRS duration (exclusive), in milliseconds.
pub const QRS_NORMAL_LIMIT_MS: f64 = 110.0;

/// QRS duration from which a complete bundle-branch block can be called, in milliseconds.
pub const QRS_BLOCK_LIMIT_MS: f64 = 120.0;

/// Heart rate below which a sinus rhythm is bradycardic.
pub const BRADYCARDIA_BPM: f64 = 60.0;

/// Heart rate above which a sinus rhythm is tachycardic.
pub const TACHYCARDIA_BPM: f64 = 100.0;

/// Inclusive lower bound of the junctional escape rate.
pub const JUNCTIONAL_MIN_BPM: f64 = 40.0;

/// Inclusive upper bound of the junctional escape rate.
pub const JUNCTIONAL_MAX_BPM: f64 = 60.0;

/// RR coefficient of variation above which the rhythm is irregular.
pub const RR_IRREGULARITY_CV: f64 = 0.10;

/// Longest normal PR interval, in milliseconds.
pub const PR_FIRST_DEGREE_LIMIT_MS: f64 = 200.0;

/// Largest spread of PR values still considered constant, in milliseconds.
pub const PR_CONSTANT_TOLERANCE_MS: f64 = 10.0;

/// Sokolow–Lyon LVH voltage limit: S(V1) + max(R(V5), R(V6)), in millivolts.
pub const SOKOLOW_LYON_MV: f64 = 3.5;

/// Cornell LVH voltage limit for men: R(aVL) + S(V3), in millivolts.
pub const CORNELL_MALE_MV: f64 = 2.8;

/// Cornell LVH voltage limit for women: R(aVL) + S(V3), in millivolts.
pub const CORNELL_FEMALE_MV: f64 = 2.0;

/// Tall R wave in V1 for RVH, in millivolts.
pub const RVH_R_V1_MV: f64 = 0.7;

/// Deep S wave in V5/V6 for RVH, in millivolts.
pub const RVH_S_LATERAL_MV: f64 = 0.7;

/// Minimum number of qualifying leads in one region for an ST finding to count.
pub const ST_CONTIGUOUS_LEADS: usize = 2;

/// Anatomical regions and their leads, in tie-break priority order.
///
/// When two regions have the same number of qualifying leads, the one listed first wins.
pub const REGION_LEADS: [(StRegion, &[Lead]); 4] = [
    (StRegion::Anterior, &[Lead::V1, Lead::V2, Lead::V3, Lead::V4]),
    (StRegion::Inferior, &[Lead::II, Lead::III, Lead::AVF]),
    (StRegion::Lateral, &[Lead::I, Lead::AVL, Lead::V5, Lead::V6]),
    (StRegion::Posterior, &[Lead::V7, Lead::V8, Lead::V9]),
];

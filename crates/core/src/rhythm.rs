//! Rhythm classification.
//!
//! The rhythm is decided by an ordered table of rules over a small set of derived facts
//! ([`RhythmFacts`]). The first rule that applies wins; when none applies the rhythm is
//! [`Rhythm::Unclassified`].
//!
//! | # | Rule | Rhythm |
//! |---|------|--------|
//! | 1 | irregular RR, P waves not 1:1 with QRS | Atrial fibrillation |
//! | 2 | P waves absent or dissociated, QRS present, rate in junctional range | Junctional rhythm |
//! | 3 | regular, 1:1 P–QRS, rate > tachycardia limit | Sinus tachycardia |
//! | 4 | regular, 1:1 P–QRS, rate < bradycardia limit | Sinus bradycardia |
//! | 5 | regular, 1:1 P–QRS, rate within limits | Normal sinus rhythm |
//!
//! Rate limits are exclusive for tachycardia and bradycardia, so 100 bpm and 60 bpm are both
//! normal sinus rhythm with the default configuration. The junctional range is inclusive.
//! RR is regular only while its coefficient of variation is strictly below the threshold.

use crate::config::RhythmConfig;
use crate::record::EcgParameterRecord;
use crate::summary::Rhythm;

/// How P waves relate to QRS complexes on the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PQrsRelation {
    /// One P wave before every QRS complex.
    Consistent,
    /// No P waves seen.
    Absent,
    /// P waves present but not one per QRS complex.
    Dissociated,
}

impl PQrsRelation {
    pub fn from_record(record: &EcgParameterRecord) -> Self {
        if record.p_wave_presence() == Some(false) || record.p_wave_count() == 0 {
            PQrsRelation::Absent
        } else if record.p_wave_count() == record.qrs_count() {
            PQrsRelation::Consistent
        } else {
            PQrsRelation::Dissociated
        }
    }
}

/// Inputs the rhythm rules are evaluated against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RhythmFacts {
    pub heart_rate_bpm: f64,
    /// Coefficient of variation of the RR intervals.
    pub rr_cv: f64,
    pub relation: PQrsRelation,
    pub qrs_present: bool,
}

impl RhythmFacts {
    pub fn from_record(record: &EcgParameterRecord) -> Self {
        Self {
            heart_rate_bpm: record.heart_rate_bpm(),
            rr_cv: coefficient_of_variation(record.rr_intervals_ms()),
            relation: PQrsRelation::from_record(record),
            qrs_present: record.qrs_count() > 0,
        }
    }

    fn regular(&self, config: &RhythmConfig) -> bool {
        self.rr_cv < config.irregularity_cv
    }

    fn sinus(&self, config: &RhythmConfig) -> bool {
        self.regular(config) && self.relation == PQrsRelation::Consistent
    }
}

struct RhythmRule {
    rhythm: Rhythm,
    applies: fn(&RhythmFacts, &RhythmConfig) -> bool,
}

const RHYTHM_RULES: [RhythmRule; 5] = [
    RhythmRule {
        rhythm: Rhythm::AtrialFibrillation,
        applies: atrial_fibrillation,
    },
    RhythmRule {
        rhythm: Rhythm::Junctional,
        applies: junctional,
    },
    RhythmRule {
        rhythm: Rhythm::SinusTachycardia,
        applies: sinus_tachycardia,
    },
    RhythmRule {
        rhythm: Rhythm::SinusBradycardia,
        applies: sinus_bradycardia,
    },
    RhythmRule {
        rhythm: Rhythm::NormalSinus,
        applies: normal_sinus,
    },
];

fn atrial_fibrillation(facts: &RhythmFacts, config: &RhythmConfig) -> bool {
    !facts.regular(config) && facts.relation != PQrsRelation::Consistent
}

fn junctional(facts: &RhythmFacts, config: &RhythmConfig) -> bool {
    facts.relation != PQrsRelation::Consistent
        && facts.qrs_present
        && (config.junctional_min_bpm..=config.junctional_max_bpm).contains(&facts.heart_rate_bpm)
}

fn sinus_tachycardia(facts: &RhythmFacts, config: &RhythmConfig) -> bool {
    facts.sinus(config) && facts.heart_rate_bpm > config.tachycardia_bpm
}

fn sinus_bradycardia(facts: &RhythmFacts, config: &RhythmConfig) -> bool {
    facts.sinus(config) && facts.heart_rate_bpm < config.bradycardia_bpm
}

fn normal_sinus(facts: &RhythmFacts, config: &RhythmConfig) -> bool {
    facts.sinus(config)
        && (config.bradycardia_bpm..=config.tachycardia_bpm).contains(&facts.heart_rate_bpm)
}

pub fn classify(record: &EcgParameterRecord, config: &RhythmConfig) -> Rhythm {
    let facts = RhythmFacts::from_record(record);
    let rhythm = decide(&facts, config);
    tracing::debug!(
        rate = facts.heart_rate_bpm,
        rr_cv = facts.rr_cv,
        relation = ?facts.relation,
        %rhythm,
        "rhythm classified"
    );
    rhythm
}

/// Apply the rhythm decision table to precomputed facts.
pub fn decide(facts: &RhythmFacts, config: &RhythmConfig) -> Rhythm {
    RHYTHM_RULES
        .iter()
        .find(|rule| (rule.applies)(facts, config))
        .map(|rule| rule.rhythm)
        .unwrap_or(Rhythm::Unclassified)
}

/// Population coefficient of variation; 0 for fewer than two samples.
pub fn coefficient_of_variation(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawEcgRecord, RawPrInterval};
    use crate::validation::validate;

    const REGULAR: [f64; 4] = [800.0, 810.0, 805.0, 800.0];
    const IRREGULAR: [f64; 5] = [620.0, 910.0, 540.0, 1010.0, 700.0];

    fn facts(rate: f64, rr: &[f64], relation: PQrsRelation) -> RhythmFacts {
        RhythmFacts {
            heart_rate_bpm: rate,
            rr_cv: coefficient_of_variation(rr),
            relation,
            qrs_present: true,
        }
    }

    fn decide_default(rate: f64, rr: &[f64], relation: PQrsRelation) -> Rhythm {
        decide(&facts(rate, rr, relation), &RhythmConfig::default())
    }

    #[test]
    fn cv_of_constant_series_is_zero() {
        assert_eq!(coefficient_of_variation(&[800.0, 800.0, 800.0]), 0.0);
        assert_eq!(coefficient_of_variation(&[800.0]), 0.0);
        assert!(coefficient_of_variation(&IRREGULAR) > 0.10);
        assert!(coefficient_of_variation(&REGULAR) < 0.01);
    }

    #[test]
    fn irregular_without_consistent_p_is_atrial_fibrillation() {
        assert_eq!(
            decide_default(130.0, &IRREGULAR, PQrsRelation::Absent),
            Rhythm::AtrialFibrillation
        );
        assert_eq!(
            decide_default(50.0, &IRREGULAR, PQrsRelation::Dissociated),
            Rhythm::AtrialFibrillation
        );
    }

    #[test]
    fn irregular_with_consistent_p_is_unclassified() {
        assert_eq!(
            decide_default(75.0, &IRREGULAR, PQrsRelation::Consistent),
            Rhythm::Unclassified
        );
    }

    #[test]
    fn absent_p_at_junctional_rate_is_junctional() {
        assert_eq!(
            decide_default(45.0, &REGULAR, PQrsRelation::Absent),
            Rhythm::Junctional
        );
        assert_eq!(
            decide_default(40.0, &REGULAR, PQrsRelation::Dissociated),
            Rhythm::Junctional
        );
        assert_eq!(
            decide_default(60.0, &REGULAR, PQrsRelation::Absent),
            Rhythm::Junctional
        );
    }

    #[test]
    fn absent_p_outside_junctional_range_is_unclassified() {
        assert_eq!(
            decide_default(80.0, &REGULAR, PQrsRelation::Absent),
            Rhythm::Unclassified
        );
        assert_eq!(
            decide_default(35.0, &REGULAR, PQrsRelation::Absent),
            Rhythm::Unclassified
        );
    }

    #[test]
    fn tachycardia_boundary_is_exclusive() {
        assert_eq!(
            decide_default(99.0, &REGULAR, PQrsRelation::Consistent),
            Rhythm::NormalSinus
        );
        assert_eq!(
            decide_default(100.0, &REGULAR, PQrsRelation::Consistent),
            Rhythm::NormalSinus
        );
        assert_eq!(
            decide_default(101.0, &REGULAR, PQrsRelation::Consistent),
            Rhythm::SinusTachycardia
        );
    }

    #[test]
    fn bradycardia_boundary_is_exclusive() {
        assert_eq!(
            decide_default(59.0, &REGULAR, PQrsRelation::Consistent),
            Rhythm::SinusBradycardia
        );
        assert_eq!(
            decide_default(60.0, &REGULAR, PQrsRelation::Consistent),
            Rhythm::NormalSinus
        );
    }

    #[test]
    fn cv_at_threshold_is_not_regular() {
        let rr = [900.0, 1100.0];
        assert_eq!(coefficient_of_variation(&rr), 0.10);
        assert_eq!(
            decide_default(75.0, &rr, PQrsRelation::Consistent),
            Rhythm::Unclassified
        );
        assert_eq!(
            decide_default(75.0, &[950.0, 1050.0], PQrsRelation::Consistent),
            Rhythm::NormalSinus
        );
    }

    #[test]
    fn irregularity_threshold_is_configurable() {
        let config = RhythmConfig {
            irregularity_cv: 0.5,
            ..RhythmConfig::default()
        };
        let facts = facts(130.0, &IRREGULAR, PQrsRelation::Absent);
        assert_eq!(decide(&facts, &config), Rhythm::Unclassified);
    }

    fn record(p: u32, qrs: u32, presence: Option<bool>) -> EcgParameterRecord {
        let raw = RawEcgRecord {
            pr_interval_ms: Some(RawPrInterval::Constant(160.0)),
            heart_rate_bpm: Some(72.0),
            rr_intervals_ms: REGULAR.to_vec(),
            p_wave_count: Some(p),
            qrs_count: Some(qrs),
            p_wave_presence: presence,
            ..RawEcgRecord::default()
        };
        validate(&raw).expect("test record should validate")
    }

    #[test]
    fn relation_is_derived_from_counts_and_presence_flag() {
        assert_eq!(
            PQrsRelation::from_record(&record(5, 5, None)),
            PQrsRelation::Consistent
        );
        assert_eq!(
            PQrsRelation::from_record(&record(6, 5, Some(true))),
            PQrsRelation::Dissociated
        );
        assert_eq!(
            PQrsRelation::from_record(&record(0, 5, None)),
            PQrsRelation::Absent
        );
        assert_eq!(
            PQrsRelation::from_record(&record(5, 5, Some(false))),
            PQrsRelation::Absent
        );
    }

    #[test]
    fn classify_reads_the_record() {
        let rhythm = classify(&record(5, 5, None), &RhythmConfig::default());
        assert_eq!(rhythm, Rhythm::NormalSinus);
    }
}

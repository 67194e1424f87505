//! Ventricular hypertrophy voltage criteria.
//!
//! Each criterion evaluates to a [`Criterion`] so that "not measured" never reads as "normal":
//! - Sokolow–Lyon (LVH): S(V1) + max(R(V5), R(V6)) > limit. Met with S(V1) and either lateral R;
//!   ruling it out needs S(V1) and both R(V5) and R(V6).
//! - Cornell (LVH): R(aVL) + S(V3) > sex-specific limit. Needs sex, R(aVL) and S(V3).
//! - RVH: tall R(V1), right axis deviation, and a deep S in V5 or V6, all three together.
//!
//! The result is `Unknown` only when no criterion could be evaluated at all.

use crate::config::HypertrophyConfig;
use crate::record::EcgParameterRecord;
use crate::summary::Hypertrophy;
use ecg_types::{Lead, Sex};

/// Outcome of one voltage criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criterion {
    Met,
    NotMet,
    /// A required input was not measured.
    Indeterminate,
}

impl Criterion {
    fn from_bool(met: bool) -> Self {
        if met {
            Criterion::Met
        } else {
            Criterion::NotMet
        }
    }

    /// All parts must hold; any known failure decides, otherwise unknown parts leave it open.
    fn all(parts: &[Option<bool>]) -> Self {
        if parts.contains(&Some(false)) {
            Criterion::NotMet
        } else if parts.iter().all(|part| *part == Some(true)) {
            Criterion::Met
        } else {
            Criterion::Indeterminate
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HypertrophyCriteria {
    pub sokolow_lyon: Criterion,
    pub cornell: Criterion,
    pub rvh: Criterion,
}

pub fn sokolow_lyon(record: &EcgParameterRecord, config: &HypertrophyConfig) -> Criterion {
    let Some(s_v1) = record.s_amplitude(Lead::V1) else {
        return Criterion::Indeterminate;
    };
    let (r_v5, r_v6) = (record.r_amplitude(Lead::V5), record.r_amplitude(Lead::V6));
    let Some(r_lateral) = r_v5.into_iter().chain(r_v6).reduce(f64::max) else {
        return Criterion::Indeterminate;
    };
    if s_v1 + r_lateral > config.sokolow_lyon_mv {
        Criterion::Met
    } else if r_v5.is_some() && r_v6.is_some() {
        Criterion::NotMet
    } else {
        // The unmeasured lateral lead could still carry the sum over the limit.
        Criterion::Indeterminate
    }
}

pub fn cornell(record: &EcgParameterRecord, config: &HypertrophyConfig) -> Criterion {
    let limit = match record.sex() {
        Some(Sex::Male) => config.cornell_male_mv,
        Some(Sex::Female) => config.cornell_female_mv,
        None => return Criterion::Indeterminate,
    };
    match (record.r_amplitude(Lead::AVL), record.s_amplitude(Lead::V3)) {
        (Some(r_avl), Some(s_v3)) => Criterion::from_bool(r_avl + s_v3 > limit),
        _ => Criterion::Indeterminate,
    }
}

pub fn right_ventricular(record: &EcgParameterRecord, config: &HypertrophyConfig) -> Criterion {
    let tall_r_v1 = record
        .r_amplitude(Lead::V1)
        .map(|r| r > config.rvh_r_v1_mv);

    let lateral_s = [
        record.s_amplitude(Lead::V5),
        record.s_amplitude(Lead::V6),
    ];
    let deep_lateral_s = if lateral_s
        .iter()
        .flatten()
        .any(|s| *s >= config.rvh_s_lateral_mv)
    {
        Some(true)
    } else if lateral_s.iter().all(Option::is_some) {
        Some(false)
    } else {
        None
    };

    Criterion::all(&[tall_r_v1, record.right_axis_deviation(), deep_lateral_s])
}

pub fn evaluate(record: &EcgParameterRecord, config: &HypertrophyConfig) -> HypertrophyCriteria {
    HypertrophyCriteria {
        sokolow_lyon: sokolow_lyon(record, config),
        cornell: cornell(record, config),
        rvh: right_ventricular(record, config),
    }
}

pub fn score(record: &EcgParameterRecord, config: &HypertrophyConfig) -> Hypertrophy {
    let criteria = evaluate(record, config);
    let lvh = criteria.sokolow_lyon == Criterion::Met || criteria.cornell == Criterion::Met;
    let rvh = criteria.rvh == Criterion::Met;

    let result = match (lvh, rvh) {
        (true, true) => Hypertrophy::Both,
        (true, false) => Hypertrophy::Lvh,
        (false, true) => Hypertrophy::Rvh,
        (false, false) => {
            let evaluated = [criteria.sokolow_lyon, criteria.cornell, criteria.rvh]
                .iter()
                .any(|c| *c != Criterion::Indeterminate);
            if evaluated {
                Hypertrophy::None
            } else {
                Hypertrophy::Unknown
            }
        }
    };

    tracing::debug!(?criteria, %result, "hypertrophy scored");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawEcgRecord, RawPrInterval};
    use crate::validation::validate;

    struct Voltages<'a> {
        r: &'a [(&'a str, f64)],
        s: &'a [(&'a str, f64)],
        sex: Option<Sex>,
        right_axis: Option<bool>,
    }

    fn record(v: Voltages<'_>) -> EcgParameterRecord {
        let raw = RawEcgRecord {
            r_amplitude: v.r.iter().map(|(l, x)| (l.to_string(), *x)).collect(),
            s_amplitude: v.s.iter().map(|(l, x)| (l.to_string(), *x)).collect(),
            sex: v.sex,
            right_axis_deviation: v.right_axis,
            pr_interval_ms: Some(RawPrInterval::Constant(160.0)),
            heart_rate_bpm: Some(72.0),
            rr_intervals_ms: vec![830.0],
            p_wave_count: Some(1),
            qrs_count: Some(1),
            ..RawEcgRecord::default()
        };
        validate(&raw).expect("test record should validate")
    }

    fn score_default(v: Voltages<'_>) -> Hypertrophy {
        score(&record(v), &HypertrophyConfig::default())
    }

    #[test]
    fn sokolow_lyon_alone_flags_lvh_without_cornell_inputs() {
        let result = score_default(Voltages {
            r: &[("V6", 2.0)],
            s: &[("V1", 2.0)],
            sex: None,
            right_axis: None,
        });
        assert_eq!(result, Hypertrophy::Lvh);
    }

    #[test]
    fn sokolow_lyon_uses_larger_lateral_r_and_is_strict() {
        let rec = record(Voltages {
            r: &[("V5", 2.0), ("V6", 1.0)],
            s: &[("V1", 1.5)],
            sex: None,
            right_axis: None,
        });
        assert_eq!(
            sokolow_lyon(&rec, &HypertrophyConfig::default()),
            Criterion::NotMet
        );
    }

    #[test]
    fn sokolow_lyon_with_one_lateral_lead_cannot_rule_out() {
        let rec = record(Voltages {
            r: &[("V6", 1.0)],
            s: &[("V1", 1.5)],
            sex: None,
            right_axis: None,
        });
        assert_eq!(
            sokolow_lyon(&rec, &HypertrophyConfig::default()),
            Criterion::Indeterminate
        );
        assert_eq!(score(&rec, &HypertrophyConfig::default()), Hypertrophy::Unknown);
    }

    #[test]
    fn cornell_limit_depends_on_sex() {
        let voltages = |sex| Voltages {
            r: &[("aVL", 1.2)],
            s: &[("V3", 1.2)],
            sex,
            right_axis: None,
        };
        assert_eq!(score_default(voltages(Some(Sex::Female))), Hypertrophy::Lvh);
        assert_eq!(score_default(voltages(Some(Sex::Male))), Hypertrophy::None);
    }

    #[test]
    fn cornell_without_sex_is_indeterminate() {
        let rec = record(Voltages {
            r: &[("aVL", 2.0)],
            s: &[("V3", 2.0)],
            sex: None,
            right_axis: None,
        });
        assert_eq!(
            cornell(&rec, &HypertrophyConfig::default()),
            Criterion::Indeterminate
        );
    }

    #[test]
    fn rvh_requires_all_three_findings() {
        let full = Voltages {
            r: &[("V1", 1.0)],
            s: &[("V5", 0.9)],
            sex: None,
            right_axis: Some(true),
        };
        assert_eq!(score_default(full), Hypertrophy::Rvh);

        let no_axis = Voltages {
            r: &[("V1", 1.0)],
            s: &[("V5", 0.9), ("V6", 0.8)],
            sex: None,
            right_axis: Some(false),
        };
        assert_eq!(score_default(no_axis), Hypertrophy::None);

        let unknown_axis = record(Voltages {
            r: &[("V1", 1.0)],
            s: &[("V6", 0.9)],
            sex: None,
            right_axis: None,
        });
        assert_eq!(
            right_ventricular(&unknown_axis, &HypertrophyConfig::default()),
            Criterion::Indeterminate
        );
    }

    #[test]
    fn shallow_lateral_s_fails_rvh() {
        let rec = record(Voltages {
            r: &[("V1", 1.0)],
            s: &[("V5", 0.2), ("V6", 0.1)],
            sex: None,
            right_axis: Some(true),
        });
        assert_eq!(
            right_ventricular(&rec, &HypertrophyConfig::default()),
            Criterion::NotMet
        );
    }

    #[test]
    fn lvh_and_rvh_together_is_both() {
        let result = score_default(Voltages {
            r: &[("V1", 1.0), ("V6", 2.5)],
            s: &[("V1", 1.5), ("V5", 0.9)],
            sex: None,
            right_axis: Some(true),
        });
        assert_eq!(result, Hypertrophy::Both);
    }

    #[test]
    fn no_measurements_is_unknown() {
        let result = score_default(Voltages {
            r: &[],
            s: &[],
            sex: Some(Sex::Male),
            right_axis: None,
        });
        assert_eq!(result, Hypertrophy::Unknown);
    }
}

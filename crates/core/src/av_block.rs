//! AV conduction grading.
//!
//! Grading is an ordered decision table over [`AvFacts`], first match wins:
//!
//! | # | Condition | Classification |
//! |---|-----------|----------------|
//! | 1 | P = QRS, every PR ≤ 200 ms | Normal conduction |
//! | 2 | P = QRS, any PR > 200 ms | First-degree AV block |
//! | 3 | dropped QRS, PR lengthens before each drop then resets | Mobitz I |
//! | 4 | dropped QRS, PR constant | Mobitz II |
//! | 5 | anything else (no fixed P–QRS relationship) | Third-degree AV block |
//!
//! A 1:1 strip always grades as rule 1 or 2, whatever the PR spread.
//! "Constant" means the spread of conducted PR values is within the configured tolerance.
//! "Lengthens" means at least two consecutive conducted PR values, strictly increasing,
//! immediately before the drop.
//!
//! Per-beat PR sequences mark dropped beats explicitly (see [`PrBeat::Dropped`]). A sequence
//! without drop markers is read as one Wenckebach cycle: it lengthens and then the final value
//! resets below the first.
//!
//! Second-degree grades also report a conduction ratio (`pattern`). Mobitz I uses P:QRS per
//! Wenckebach cycle, e.g. `4:3`; Mobitz II uses `N+1:1` for N dropped beats. Mobitz I also reports
//! the conducted PR progression.

use crate::config::AvConfig;
use crate::record::{EcgParameterRecord, PrBeat, PrInterval};
use crate::summary::{AvClassification, AvConduction};

/// Inputs the AV grading rules are evaluated against.
#[derive(Clone, Debug, PartialEq)]
pub struct AvFacts {
    pub p_waves: u32,
    pub qrs_complexes: u32,
    pub missing_beats: u32,
    pub pr_constant: bool,
    /// Longest conducted PR interval.
    pub max_pr_ms: f64,
    /// Conducted beats in each Wenckebach cycle, when the PR sequence shows them.
    pub wenckebach_cycles: Option<Vec<usize>>,
}

impl AvFacts {
    pub fn from_record(record: &EcgParameterRecord, config: &AvConfig) -> Self {
        let p_waves = record.p_wave_count();
        let qrs_complexes = record.qrs_count();
        let conducted = record.pr_interval().conducted();

        Self {
            p_waves,
            qrs_complexes,
            missing_beats: p_waves.saturating_sub(qrs_complexes),
            pr_constant: spread(&conducted) <= config.pr_constant_tolerance_ms,
            max_pr_ms: conducted.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            wenckebach_cycles: wenckebach_cycles(record.pr_interval()),
        }
    }

    fn one_to_one(&self) -> bool {
        self.p_waves == self.qrs_complexes
    }
}

struct AvRule {
    classification: AvClassification,
    applies: fn(&AvFacts, &AvConfig) -> bool,
}

const AV_RULES: [AvRule; 4] = [
    AvRule {
        classification: AvClassification::Normal,
        applies: normal,
    },
    AvRule {
        classification: AvClassification::FirstDegree,
        applies: first_degree,
    },
    AvRule {
        classification: AvClassification::MobitzI,
        applies: mobitz_i,
    },
    AvRule {
        classification: AvClassification::MobitzII,
        applies: mobitz_ii,
    },
];

fn normal(facts: &AvFacts, config: &AvConfig) -> bool {
    facts.one_to_one() && facts.max_pr_ms <= config.first_degree_pr_ms
}

fn first_degree(facts: &AvFacts, config: &AvConfig) -> bool {
    facts.one_to_one() && facts.max_pr_ms > config.first_degree_pr_ms
}

fn mobitz_i(facts: &AvFacts, _config: &AvConfig) -> bool {
    facts.missing_beats > 0 && facts.wenckebach_cycles.is_some()
}

fn mobitz_ii(facts: &AvFacts, _config: &AvConfig) -> bool {
    facts.missing_beats > 0 && facts.pr_constant
}

pub fn grade(record: &EcgParameterRecord, config: &AvConfig) -> AvConduction {
    let facts = AvFacts::from_record(record, config);
    let classification = decide(&facts, config);

    tracing::debug!(
        p_waves = facts.p_waves,
        qrs_complexes = facts.qrs_complexes,
        pr_constant = facts.pr_constant,
        max_pr_ms = facts.max_pr_ms,
        %classification,
        "AV conduction graded"
    );

    let (pattern, pr_progression) = match classification {
        AvClassification::MobitzI => (
            facts
                .wenckebach_cycles
                .as_deref()
                .map(|cycles| cycle_ratio(cycles, &facts)),
            Some(record.pr_interval().conducted()),
        ),
        AvClassification::MobitzII => (Some(format!("{}:1", facts.missing_beats + 1)), None),
        _ => (None, None),
    };

    AvConduction {
        p_waves: facts.p_waves,
        qrs_complexes: facts.qrs_complexes,
        missing_beats: facts.missing_beats,
        classification,
        pattern,
        pr_progression,
    }
}

/// Apply the AV decision table to precomputed facts.
pub fn decide(facts: &AvFacts, config: &AvConfig) -> AvClassification {
    AV_RULES
        .iter()
        .find(|rule| (rule.applies)(facts, config))
        .map(|rule| rule.classification)
        .unwrap_or(AvClassification::ThirdDegree)
}

/// `n+1:n` when every cycle conducts `n` beats, otherwise the overall P:QRS ratio.
fn cycle_ratio(cycles: &[usize], facts: &AvFacts) -> String {
    match cycles.first() {
        Some(&n) if cycles.iter().all(|c| *c == n) => format!("{}:{}", n + 1, n),
        _ => format!("{}:{}", facts.p_waves, facts.qrs_complexes),
    }
}

fn spread(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if values.is_empty() {
        0.0
    } else {
        max - min
    }
}

fn lengthens(run: &[f64]) -> bool {
    run.len() >= 2 && run.windows(2).all(|pair| pair[1] > pair[0])
}

fn wenckebach_cycles(pr: &PrInterval) -> Option<Vec<usize>> {
    let beats = match pr {
        PrInterval::Constant(_) => return None,
        PrInterval::PerBeat(beats) => beats,
    };

    if !beats.contains(&PrBeat::Dropped) {
        let conducted = pr.conducted();
        let (last, cycle) = conducted.split_last()?;
        let resets = lengthens(cycle) && cycle.first().is_some_and(|first| last < first);
        return resets.then(|| vec![conducted.len()]);
    }

    let mut run: Vec<f64> = Vec::new();
    let mut cycles = Vec::new();

    for (i, beat) in beats.iter().enumerate() {
        match beat {
            PrBeat::Conducted(pr) => run.push(*pr),
            PrBeat::Dropped => {
                // A drop with nothing conducted before it tells us nothing about lengthening.
                let Some(&last) = run.last() else {
                    continue;
                };
                if !lengthens(&run) {
                    return None;
                }
                if let Some(PrBeat::Conducted(next)) = beats.get(i + 1) {
                    if *next >= last {
                        return None;
                    }
                }
                cycles.push(run.len());
                run.clear();
            }
        }
    }

    (!cycles.is_empty()).then_some(cycles)
}

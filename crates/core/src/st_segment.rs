//! ST-segment analysis.
//!
//! A lead qualifies for elevation when its deviation is at or above the elevation threshold for
//! its lead group (limb or precordial), and for depression when its deviation is at or below the
//! negated depression threshold. A finding only counts when at least two qualifying leads share
//! an anatomical region; a single elevated lead is treated as noise.
//!
//! Localization picks the region with the most qualifying elevated leads, breaking ties by
//! [`REGION_LEADS`] order (Anterior, Inferior, Lateral, Posterior). aVR belongs to no region.

use crate::config::StConfig;
use crate::constants::{REGION_LEADS, ST_CONTIGUOUS_LEADS};
use crate::record::EcgParameterRecord;
use crate::summary::{Localization, StAnalysis, StRegion};
use ecg_types::Lead;
use std::collections::{BTreeMap, BTreeSet};

pub fn analyze(record: &EcgParameterRecord, config: &StConfig) -> StAnalysis {
    let deviations = record.st_deviation();

    let elevated: BTreeSet<Lead> = deviations
        .iter()
        .filter(|(lead, deviation)| **deviation >= elevation_threshold(**lead, config))
        .map(|(lead, _)| *lead)
        .collect();

    let depressed: BTreeSet<Lead> = deviations
        .iter()
        .filter(|(_, deviation)| **deviation <= -config.depression_mv)
        .map(|(lead, _)| *lead)
        .collect();

    let localization = localize(&elevated, deviations);
    let st_elevation = localization.region != StRegion::None;
    let st_depression = has_contiguous(&depressed);

    tracing::debug!(
        elevated = elevated.len(),
        depressed = depressed.len(),
        region = ?localization.region,
        "ST segment analysed"
    );

    StAnalysis {
        st_elevation,
        localization,
        st_depression,
    }
}

fn elevation_threshold(lead: Lead, config: &StConfig) -> f64 {
    if lead.is_precordial() {
        config.precordial_elevation_mv
    } else {
        config.limb_elevation_mv
    }
}

/// Qualifying leads of one region, in table order.
fn region_hits(region_leads: &[Lead], qualifying: &BTreeSet<Lead>) -> Vec<Lead> {
    region_leads
        .iter()
        .copied()
        .filter(|lead| qualifying.contains(lead))
        .collect()
}

fn has_contiguous(qualifying: &BTreeSet<Lead>) -> bool {
    REGION_LEADS
        .iter()
        .any(|(_, leads)| region_hits(leads, qualifying).len() >= ST_CONTIGUOUS_LEADS)
}

fn localize(elevated: &BTreeSet<Lead>, deviations: &BTreeMap<Lead, f64>) -> Localization {
    let mut best: Option<(StRegion, Vec<Lead>)> = None;

    for (region, leads) in REGION_LEADS.iter() {
        let hits = region_hits(leads, elevated);
        if hits.len() < ST_CONTIGUOUS_LEADS {
            continue;
        }
        // Strictly greater: an equal count keeps the earlier, higher-priority region.
        let better = best
            .as_ref()
            .is_none_or(|(_, current)| hits.len() > current.len());
        if better {
            best = Some((*region, hits));
        }
    }

    match best {
        Some((region, leads)) => {
            let max_st_elev = leads
                .iter()
                .filter_map(|lead| deviations.get(lead).copied())
                .reduce(f64::max);
            Localization {
                region,
                leads,
                max_st_elev,
            }
        }
        None => Localization::none(),
    }
}

//! Parameter validation.
//!
//! Turns a [`RawEcgRecord`] into an [`EcgParameterRecord`] or rejects it. Validation is
//! reject-or-pass: values are never clamped, rounded or filled in.
//!
//! Checks applied:
//! - every lead name in `st_deviation`, `r_amplitude` and `s_amplitude` is a known lead
//! - every morphology marker is a known marker
//! - `heart_rate_bpm` is present and > 0
//! - `qrs_duration_ms` (when given) and every PR value are non-negative
//! - `rr_intervals_ms` is non-empty and every interval is > 0
//! - `p_wave_count`, `qrs_count` and `pr_interval_ms` are present
//! - amplitudes are non-negative magnitudes, and every number is finite
//!
//! Missing mandatory fields produce [`EcgError::InsufficientData`]; malformed values produce
//! [`EcgError::Validation`]. Both name the offending field.

use crate::record::{EcgParameterRecord, PrBeat, PrInterval, RawEcgRecord, RawPrInterval};
use crate::{EcgError, EcgResult};
use ecg_types::{Lead, MorphologyMarker};
use std::collections::{BTreeMap, BTreeSet};

/// Validate a raw record.
///
/// # Errors
///
/// Returns the first [`EcgError::Validation`] or [`EcgError::InsufficientData`] encountered, in
/// field declaration order.
pub fn validate(raw: &RawEcgRecord) -> EcgResult<EcgParameterRecord> {
    let st_deviation = lead_map("st_deviation", &raw.st_deviation, Sign::Any)?;

    let qrs_duration_ms = raw
        .qrs_duration_ms
        .map(|qrs| non_negative("qrs_duration_ms", qrs))
        .transpose()?;

    let pr_interval = match &raw.pr_interval_ms {
        Some(pr) => pr_interval(pr)?,
        None => return Err(EcgError::insufficient("pr_interval_ms")),
    };

    let heart_rate_bpm = raw
        .heart_rate_bpm
        .ok_or_else(|| EcgError::insufficient("heart_rate_bpm"))?;
    if !heart_rate_bpm.is_finite() || heart_rate_bpm <= 0.0 {
        return Err(EcgError::validation(
            "heart_rate_bpm",
            format!("must be greater than 0 (got {heart_rate_bpm})"),
        ));
    }

    if raw.rr_intervals_ms.is_empty() {
        return Err(EcgError::validation("rr_intervals_ms", "must not be empty"));
    }
    for rr in &raw.rr_intervals_ms {
        if !rr.is_finite() || *rr <= 0.0 {
            return Err(EcgError::validation(
                "rr_intervals_ms",
                format!("every interval must be greater than 0 (got {rr})"),
            ));
        }
    }

    let p_wave_count = raw
        .p_wave_count
        .ok_or_else(|| EcgError::insufficient("p_wave_count"))?;
    let qrs_count = raw
        .qrs_count
        .ok_or_else(|| EcgError::insufficient("qrs_count"))?;

    let r_amplitude = lead_map("r_amplitude", &raw.r_amplitude, Sign::NonNegative)?;
    let s_amplitude = lead_map("s_amplitude", &raw.s_amplitude, Sign::NonNegative)?;

    let qrs_morphology_markers = raw
        .qrs_morphology_markers
        .iter()
        .map(|name| {
            MorphologyMarker::parse(name)
                .map_err(|e| EcgError::validation("qrs_morphology_markers", e.to_string()))
        })
        .collect::<EcgResult<BTreeSet<_>>>()?;

    Ok(EcgParameterRecord {
        st_deviation,
        qrs_duration_ms,
        pr_interval,
        heart_rate_bpm,
        rr_intervals_ms: raw.rr_intervals_ms.clone(),
        p_wave_count,
        qrs_count,
        r_amplitude,
        s_amplitude,
        qrs_morphology_markers,
        sex: raw.sex,
        right_axis_deviation: raw.right_axis_deviation,
        p_wave_presence: raw.p_wave_presence,
    })
}

#[derive(Clone, Copy)]
enum Sign {
    Any,
    NonNegative,
}

fn lead_map(
    field: &str,
    values: &BTreeMap<String, f64>,
    sign: Sign,
) -> EcgResult<BTreeMap<Lead, f64>> {
    let mut leads = BTreeMap::new();
    for (name, value) in values {
        let lead = Lead::parse(name).map_err(|e| EcgError::validation(field, e.to_string()))?;
        if !value.is_finite() {
            return Err(EcgError::validation(
                format!("{field}.{name}"),
                "must be a finite number",
            ));
        }
        if matches!(sign, Sign::NonNegative) && *value < 0.0 {
            return Err(EcgError::validation(
                format!("{field}.{name}"),
                format!("amplitude must be non-negative (got {value})"),
            ));
        }
        leads.insert(lead, *value);
    }
    Ok(leads)
}

fn non_negative(field: &str, value: f64) -> EcgResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(EcgError::validation(
            field,
            format!("must be non-negative (got {value})"),
        ));
    }
    Ok(value)
}

fn pr_interval(raw: &RawPrInterval) -> EcgResult<PrInterval> {
    match raw {
        RawPrInterval::Constant(pr) => Ok(PrInterval::Constant(non_negative(
            "pr_interval_ms",
            *pr,
        )?)),
        RawPrInterval::PerBeat(beats) => {
            let beats = beats
                .iter()
                .map(|beat| match beat {
                    Some(pr) => non_negative("pr_interval_ms", *pr).map(PrBeat::Conducted),
                    None => Ok(PrBeat::Dropped),
                })
                .collect::<EcgResult<Vec<_>>>()?;

            if !beats.iter().any(|beat| matches!(beat, PrBeat::Conducted(_))) {
                return Err(EcgError::validation(
                    "pr_interval_ms",
                    "must contain at least one conducted beat",
                ));
            }
            Ok(PrInterval::PerBeat(beats))
        }
    }
}

//! Bundle-branch block and intraventricular conduction classification.
//!
//! Marker sets (each needs one marker from every group):
//! - RBBB: rsR' or broad R in V1, and a wide terminal S in I or V6
//! - LBBB: broad notched R in I or V6, and absent septal Q in I or V6
//!
//! Duration limits with the default configuration:
//! - QRS < 110 ms: Normal, markers are not consulted
//! - 110 ≤ QRS < 120 ms: IVCD
//! - QRS ≥ 120 ms: RBBB or LBBB when that marker set is satisfied, otherwise IVCD
//!
//! A widened QRS that satisfies both marker sets is reported as
//! [`EcgError::AmbiguousEvidence`] instead of picking one.

use crate::config::ConductionConfig;
use crate::record::EcgParameterRecord;
use crate::summary::ConductionAbnormality;
use crate::{EcgError, EcgResult};
use ecg_types::MorphologyMarker;

const RBBB_EVIDENCE: [&[MorphologyMarker]; 2] = [
    &[MorphologyMarker::RsrPrimeV1, MorphologyMarker::BroadRV1],
    &[
        MorphologyMarker::WideTerminalSI,
        MorphologyMarker::WideTerminalSV6,
    ],
];

const LBBB_EVIDENCE: [&[MorphologyMarker]; 2] = [
    &[
        MorphologyMarker::BroadNotchedRI,
        MorphologyMarker::BroadNotchedRV6,
    ],
    &[MorphologyMarker::AbsentQI, MorphologyMarker::AbsentQV6],
];

fn satisfies(record: &EcgParameterRecord, evidence: &[&[MorphologyMarker]]) -> bool {
    evidence
        .iter()
        .all(|group| group.iter().any(|marker| record.has_marker(*marker)))
}

/// Classify intraventricular conduction.
///
/// # Errors
///
/// - [`EcgError::InsufficientData`] when the record has no QRS duration
/// - [`EcgError::AmbiguousEvidence`] when a widened QRS carries both RBBB and LBBB marker sets
pub fn classify(
    record: &EcgParameterRecord,
    config: &ConductionConfig,
) -> EcgResult<ConductionAbnormality> {
    let qrs = record
        .qrs_duration_ms()
        .ok_or_else(|| EcgError::insufficient("qrs_duration_ms"))?;

    if qrs < config.qrs_normal_limit_ms {
        return Ok(ConductionAbnormality::Normal);
    }

    let rbbb = satisfies(record, &RBBB_EVIDENCE);
    let lbbb = satisfies(record, &LBBB_EVIDENCE);

    if rbbb && lbbb {
        return Err(EcgError::AmbiguousEvidence(format!(
            "QRS {qrs} ms carries both RBBB and LBBB morphology markers"
        )));
    }

    let result = if qrs >= config.qrs_block_limit_ms && rbbb {
        ConductionAbnormality::Rbbb
    } else if qrs >= config.qrs_block_limit_ms && lbbb {
        ConductionAbnormality::Lbbb
    } else {
        ConductionAbnormality::Ivcd
    };

    tracing::debug!(qrs, rbbb, lbbb, %result, "conduction classified");
    Ok(result)
}

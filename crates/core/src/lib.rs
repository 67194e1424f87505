//! # ECG Core
//!
//! Deterministic rule engine that turns one 12-lead ECG parameter record into a structured
//! diagnostic summary.
//!
//! Pipeline:
//! - [`validation::validate`] checks the raw record and produces an [`EcgParameterRecord`]
//! - five independent classifiers run over the validated record:
//!   [`st_segment`], [`rhythm`], [`conduction`], [`av_block`], [`hypertrophy`]
//! - [`summary::aggregate`] merges their outputs into a [`DiagnosticSummary`]
//!
//! Validation failures abort before any classifier runs. Conduction-level problems (ambiguous
//! markers, missing QRS duration) become field states in the summary instead.
//!
//! **No I/O**: reading record files and printing or serving summaries belong in `ecg-cli` and
//! `ecg-run`. Everything here is a pure function of the record and the [`ClassifierConfig`].

pub mod av_block;
pub mod conduction;
pub mod config;
pub mod constants;
mod error;
pub mod hypertrophy;
pub mod record;
pub mod rhythm;
pub mod st_segment;
pub mod summary;
pub mod validation;
pub mod wire;

pub use config::ClassifierConfig;
pub use error::{EcgError, EcgResult};
pub use record::{EcgParameterRecord, PrBeat, PrInterval, RawEcgRecord, RawPrInterval};
pub use summary::{
    AvClassification, AvConduction, ConductionAbnormality, DiagnosticSummary, Hypertrophy,
    Localization, Rhythm, StAnalysis, StRegion,
};

pub use ecg_types::{Lead, MorphologyMarker, Sex};

/// Classifies ECG parameter records with a fixed configuration.
///
/// Holds no state besides the configuration, so one instance can classify any number of records
/// and classifying the same record twice yields identical summaries.
#[derive(Clone, Debug, Default)]
pub struct EcgClassifier {
    config: ClassifierConfig,
}

impl EcgClassifier {
    /// Creates a classifier, validating the configuration first.
    ///
    /// # Errors
    ///
    /// Returns [`EcgError::InvalidConfig`] if any threshold is non-positive or inconsistent.
    pub fn new(config: ClassifierConfig) -> EcgResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Validates and classifies one raw record.
    ///
    /// # Errors
    ///
    /// Returns [`EcgError::Validation`] or [`EcgError::InsufficientData`] if the record is
    /// rejected by the validator. Classifier-level problems do not fail the call.
    pub fn classify(&self, raw: &RawEcgRecord) -> EcgResult<DiagnosticSummary> {
        let span = tracing::info_span!("classify");
        let _guard = span.enter();

        let record = validation::validate(raw).inspect_err(|e| {
            tracing::info!("record rejected: {}", e);
        })?;
        self.classify_record(&record)
    }

    /// Classifies an already validated record.
    pub fn classify_record(&self, record: &EcgParameterRecord) -> EcgResult<DiagnosticSummary> {
        let outputs = summary::ClassifierOutputs {
            st_analysis: st_segment::analyze(record, &self.config.st),
            rhythm: rhythm::classify(record, &self.config.rhythm),
            conduction: conduction::classify(record, &self.config.conduction),
            av_conduction: av_block::grade(record, &self.config.av),
            hypertrophy: hypertrophy::score(record, &self.config.hypertrophy),
        };
        summary::aggregate(outputs)
    }

    /// Classifies each record independently; one failure does not affect the others.
    pub fn classify_batch(&self, records: &[RawEcgRecord]) -> Vec<EcgResult<DiagnosticSummary>> {
        records.iter().map(|raw| self.classify(raw)).collect()
    }
}

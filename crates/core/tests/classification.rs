use ecg_core::wire::{parse_record_json, parse_record_yaml};
use ecg_core::{
    AvClassification, ClassifierConfig, ConductionAbnormality, EcgClassifier, EcgError,
    Hypertrophy, RawEcgRecord, Rhythm, StRegion,
};

const REFERENCE_SUMMARY: &str = r#"{
  "st_analysis": {"st_elevation": true, "localization": {"region":"Anterior","leads":["V1","V2","V3"],"max_st_elev":0.4}, "st_depression": true},
  "av_conduction": {"p_waves":5,"qrs_complexes":5,"missing_beats":0,"classification":"Normal conduction"},
  "conduction_abnormality": "IVCD",
  "hypertrophy": "LVH",
  "rhythm": "Normal sinus rhythm"
}"#;

fn anterior_ivcd_record() -> RawEcgRecord {
    parse_record_json(
        r#"{
            "st_deviation": {"V1": 0.2, "V2": 0.3, "V3": 0.4, "II": -0.15, "III": -0.12},
            "qrs_duration_ms": 130,
            "qrs_morphology_markers": ["nonspecific_QRS_widening"],
            "pr_interval_ms": 150,
            "p_wave_count": 5,
            "qrs_count": 5,
            "heart_rate_bpm": 72,
            "rr_intervals_ms": [830, 835, 828, 832],
            "r_amplitude": {"V6": 2.0},
            "s_amplitude": {"V1": 2.0}
        }"#,
    )
    .expect("reference record should parse")
}

fn classifier() -> EcgClassifier {
    EcgClassifier::new(ClassifierConfig::default()).expect("default config is valid")
}

fn sinus_record(rate: f64) -> RawEcgRecord {
    let mut raw = anterior_ivcd_record();
    raw.heart_rate_bpm = Some(rate);
    raw
}

#[test]
fn end_to_end_matches_reference_summary() {
    let summary = classifier()
        .classify(&anterior_ivcd_record())
        .expect("classify reference record");

    let actual = serde_json::to_value(&summary).expect("serialize summary");
    let expected: serde_json::Value =
        serde_json::from_str(REFERENCE_SUMMARY).expect("parse reference JSON");
    assert_eq!(actual, expected);
}

#[test]
fn classification_is_idempotent() {
    let classifier = classifier();
    let record = anterior_ivcd_record();
    let first = classifier
        .classify(&record)
        .and_then(|s| s.to_json())
        .expect("first run");
    let second = classifier
        .classify(&record)
        .and_then(|s| s.to_json())
        .expect("second run");
    assert_eq!(first, second);
}

#[test]
fn no_elevated_lead_means_no_region() {
    let mut raw = anterior_ivcd_record();
    raw.st_deviation = [("V1".to_string(), 0.05), ("II".to_string(), 0.02)]
        .into_iter()
        .collect();
    let summary = classifier().classify(&raw).expect("classify");
    assert!(!summary.st_analysis.st_elevation);
    assert_eq!(summary.st_analysis.localization.region, StRegion::None);
    assert!(summary.st_analysis.localization.leads.is_empty());
}

#[test]
fn isolated_v1_elevation_does_not_count_but_v1_v2_does() {
    let mut raw = anterior_ivcd_record();
    raw.st_deviation = [("V1".to_string(), 0.3)].into_iter().collect();
    let summary = classifier().classify(&raw).expect("classify");
    assert!(!summary.st_analysis.st_elevation);

    raw.st_deviation.insert("V2".to_string(), 0.2);
    let summary = classifier().classify(&raw).expect("classify");
    assert!(summary.st_analysis.st_elevation);
}

#[test]
fn equal_anterior_and_inferior_counts_resolve_to_anterior() {
    let mut raw = anterior_ivcd_record();
    raw.st_deviation = [("V3", 0.2), ("V4", 0.25), ("II", 0.3), ("III", 0.3)]
        .into_iter()
        .map(|(l, v)| (l.to_string(), v))
        .collect();
    let summary = classifier().classify(&raw).expect("classify");
    assert_eq!(summary.st_analysis.localization.region, StRegion::Anterior);
}

#[test]
fn heart_rate_boundary_around_tachycardia() {
    let classifier = classifier();
    let rhythm = |rate| {
        classifier
            .classify(&sinus_record(rate))
            .expect("classify")
            .rhythm
    };
    assert_eq!(rhythm(99.0), Rhythm::NormalSinus);
    assert_eq!(rhythm(100.0), Rhythm::NormalSinus);
    assert_eq!(rhythm(101.0), Rhythm::SinusTachycardia);
}

#[test]
fn progressive_pr_lengthening_before_drops_is_mobitz_i() {
    let raw = parse_record_yaml(
        r#"
pr_interval_ms: [160, 180, 200, ~, 160, 180, 200, ~]
p_wave_count: 8
qrs_count: 6
heart_rate_bpm: 64
rr_intervals_ms: [880, 900, 1500, 880, 900, 1500]
"#,
    )
    .expect("parse yaml");
    let summary = classifier().classify(&raw).expect("classify");
    assert_eq!(
        summary.av_conduction.classification,
        AvClassification::MobitzI
    );
    assert_eq!(summary.av_conduction.missing_beats, 2);
    assert_eq!(summary.av_conduction.pattern.as_deref(), Some("4:3"));

    let value = serde_json::to_value(&summary).expect("serialize summary");
    assert_eq!(value["av_conduction"]["pattern"], "4:3");
    assert_eq!(
        value["av_conduction"]["pr_progression"],
        serde_json::json!([160.0, 180.0, 200.0, 160.0, 180.0, 200.0])
    );
}

#[test]
fn constant_pr_with_occasional_drop_is_mobitz_ii() {
    let raw = parse_record_yaml(
        r#"
pr_interval_ms: 160
p_wave_count: 7
qrs_count: 6
heart_rate_bpm: 66
rr_intervals_ms: [850, 850, 1700, 850, 850]
"#,
    )
    .expect("parse yaml");
    let summary = classifier().classify(&raw).expect("classify");
    assert_eq!(
        summary.av_conduction.classification,
        AvClassification::MobitzII
    );
    assert_eq!(summary.av_conduction.pattern.as_deref(), Some("2:1"));
}

#[test]
fn one_to_one_strip_with_varying_pr_is_normal_conduction() {
    let raw = parse_record_json(
        r#"{
            "heart_rate_bpm": 75,
            "rr_intervals_ms": [800, 810, 805, 800],
            "p_wave_count": 5,
            "qrs_count": 5,
            "pr_interval_ms": [160, 165, 158, 170],
            "qrs_duration_ms": 115,
            "st_deviation": {
                "I": 0.05, "II": 0.1, "III": 0.08, "aVR": -0.1, "aVL": 0.05, "aVF": 0.1,
                "V1": 0.3, "V2": 0.4, "V3": 0.35, "V4": 0.2, "V5": 0.1, "V6": 0.05
            },
            "p_wave_presence": true
        }"#,
    )
    .expect("parse record");
    let summary = classifier().classify(&raw).expect("classify");

    assert_eq!(
        summary.av_conduction.classification,
        AvClassification::Normal
    );
    assert_eq!(summary.av_conduction.pattern, None);
    assert_eq!(summary.rhythm, Rhythm::NormalSinus);
    assert_eq!(summary.conduction_abnormality, ConductionAbnormality::Ivcd);
    assert_eq!(summary.st_analysis.localization.region, StRegion::Anterior);
}

#[test]
fn sokolow_lyon_lvh_without_cornell_inputs() {
    let summary = classifier()
        .classify(&anterior_ivcd_record())
        .expect("classify");
    assert_eq!(summary.hypertrophy, Hypertrophy::Lvh);
}

#[test]
fn conflicting_bundle_branch_markers_are_ambiguous() {
    let mut raw = anterior_ivcd_record();
    raw.qrs_duration_ms = Some(150.0);
    raw.qrs_morphology_markers = [
        "rsR_pattern_V1",
        "wide_terminal_S_I",
        "broad_notched_R_V6",
        "absent_Q_I",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect();

    let summary = classifier().classify(&raw).expect("classify");
    assert_eq!(
        summary.conduction_abnormality,
        ConductionAbnormality::Ambiguous
    );
    assert_eq!(summary.rhythm, Rhythm::NormalSinus);
    assert_eq!(summary.hypertrophy, Hypertrophy::Lvh);
}

#[test]
fn missing_qrs_duration_degrades_only_conduction() {
    let mut raw = anterior_ivcd_record();
    raw.qrs_duration_ms = None;
    let summary = classifier().classify(&raw).expect("classify");
    assert_eq!(
        summary.conduction_abnormality,
        ConductionAbnormality::Unknown
    );
    assert_eq!(
        summary.av_conduction.classification,
        AvClassification::Normal
    );
}

#[test]
fn validation_failure_aborts_the_pipeline() {
    let mut raw = anterior_ivcd_record();
    raw.st_deviation.insert("V13".to_string(), 0.2);
    let err = classifier().classify(&raw).expect_err("should reject");
    assert!(matches!(err, EcgError::Validation { .. }));

    let mut raw = anterior_ivcd_record();
    raw.p_wave_count = None;
    let err = classifier().classify(&raw).expect_err("should reject");
    assert!(matches!(err, EcgError::InsufficientData { ref field } if field == "p_wave_count"));
}

#[test]
fn batch_results_are_independent() {
    let mut bad = anterior_ivcd_record();
    bad.rr_intervals_ms.clear();
    let results = classifier().classify_batch(&[anterior_ivcd_record(), bad, sinus_record(110.0)]);

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(EcgError::Validation { .. })));
    let third = results[2].as_ref().expect("third record classifies");
    assert_eq!(third.rhythm, Rhythm::SinusTachycardia);
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let mut config = ClassifierConfig::default();
    config.conduction.qrs_normal_limit_ms = 130.0;
    let err = EcgClassifier::new(config).expect_err("should reject inverted QRS limits");
    assert!(matches!(err, EcgError::InvalidConfig(_)));
}

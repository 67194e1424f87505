use clap::{Parser, Subcommand};
use ecg_core::wire::{parse_record_json, parse_record_yaml, parse_records_json};
use ecg_core::{
    validation, ClassifierConfig, DiagnosticSummary, EcgClassifier, EcgResult, RawEcgRecord,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ecg")]
#[command(about = "12-lead ECG parameter classifier")]
struct Cli {
    /// Threshold overrides (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a parameter record and print the diagnostic summary as JSON
    ///
    /// A JSON file holding an array classifies each record independently and prints an array of
    /// results.
    Classify {
        /// Record file (.json, .yaml or .yml)
        path: PathBuf,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Check a parameter record without classifying it
    Validate {
        /// Record file (.json, .yaml or .yml)
        path: PathBuf,
    },
    /// Print the effective thresholds as YAML
    Thresholds,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Contents of a record file: one record, or a JSON array of records.
enum RecordInput {
    Single(RawEcgRecord),
    Batch(Vec<RawEcgRecord>),
}

/// Read a record file, choosing the format from the extension (JSON unless `.yaml`/`.yml`).
fn load_records(path: &Path) -> Result<RecordInput, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let input = if is_yaml(path) {
        RecordInput::Single(parse_record_yaml(&text)?)
    } else if text.trim_start().starts_with('[') {
        RecordInput::Batch(parse_records_json(&text)?)
    } else {
        RecordInput::Single(parse_record_json(&text)?)
    };
    Ok(input)
}

/// One JSON entry per record: the summary, or the error that stopped it.
fn batch_report(
    results: Vec<EcgResult<DiagnosticSummary>>,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let entries = results
        .into_iter()
        .map(|result| match result {
            Ok(summary) => serde_json::to_value(summary),
            Err(e) => Ok(serde_json::json!({
                "error": e.to_string(),
                "field": e.field(),
            })),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::Value::Array(entries))
}

fn load_config(path: Option<&Path>) -> Result<ClassifierConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            tracing::info!("using threshold overrides from {}", path.display());
            Ok(ClassifierConfig::from_yaml(&text)?)
        }
        None => Ok(ClassifierConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Classify { path, compact }) => {
            let classifier = EcgClassifier::new(config)?;
            let output = match load_records(&path)? {
                RecordInput::Single(record) => {
                    let summary = classifier.classify(&record)?;
                    if compact {
                        summary.to_json()?
                    } else {
                        summary.to_json_pretty()?
                    }
                }
                RecordInput::Batch(records) => {
                    let report = batch_report(classifier.classify_batch(&records))?;
                    if compact {
                        serde_json::to_string(&report)?
                    } else {
                        serde_json::to_string_pretty(&report)?
                    }
                }
            };
            println!("{}", output);
        }
        Some(Commands::Validate { path }) => {
            let records = match load_records(&path)? {
                RecordInput::Single(record) => vec![record],
                RecordInput::Batch(records) => records,
            };
            let mut invalid = 0;
            for (i, record) in records.iter().enumerate() {
                let label = if records.len() == 1 {
                    path.display().to_string()
                } else {
                    format!("{}[{i}]", path.display())
                };
                match validation::validate(record) {
                    Ok(_) => println!("{label}: valid"),
                    Err(e) => {
                        eprintln!("{label}: {e}");
                        invalid += 1;
                    }
                }
            }
            if invalid > 0 {
                std::process::exit(1);
            }
        }
        Some(Commands::Thresholds) => {
            print!("{}", config.to_yaml()?);
        }
        None => {
            println!("Use 'ecg --help' for commands");
        }
    }

    Ok(())
}

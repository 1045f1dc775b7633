use anyhow::Context;
use chrono::SecondsFormat;
use clap::{Args, Parser, Subcommand};
use pgs_core::{CoreConfig, CsvSink, NumericPolicy, SurveyService};
use pgs_files::{DirectorySource, RawDataInbox};
use press_ganey::{AnalysisResponse, ExportDocument, SurveyExport};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pgs")]
#[command(about = "Patient satisfaction survey export tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform every export in the raw data directory into CSV tables
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        /// Directory holding the export documents
        #[arg(long, env = "PGS_RAW_DIR", default_value = pgs_core::DEFAULT_RAW_DATA_DIR)]
        raw_dir: PathBuf,
        /// Directory the tables are written to
        #[arg(long, env = "PGS_DATA_DIR", default_value = pgs_core::DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
        /// Fetch new exports from this directory first (optional)
        #[arg(long, env = "PGS_REMOTE_DIR")]
        remote_dir: Option<PathBuf>,
    },
    /// Print a JSON summary of one export document
    Inspect {
        /// Path to the XML export
        file: PathBuf,
    },
    /// Copy new exports from a remote directory into the raw data directory
    Sync {
        /// Directory to fetch from
        #[arg(long, env = "PGS_REMOTE_DIR")]
        remote_dir: PathBuf,
        /// Directory holding the export documents
        #[arg(long, env = "PGS_RAW_DIR", default_value = pgs_core::DEFAULT_RAW_DATA_DIR)]
        raw_dir: PathBuf,
    },
}

/// Identity settings, from a YAML file or individual values.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// YAML run configuration; individual values are ignored when given
    #[arg(long)]
    config: Option<PathBuf>,
    /// Vendor client number
    #[arg(long, env = "PGS_CLIENT_ID")]
    client_id: Option<String>,
    /// Type tag for patient chart numbers
    #[arg(long, env = "PGS_PATIENT_ID_TYPE")]
    patient_id_type: Option<String>,
    /// Type tag for encounter numbers
    #[arg(long, env = "PGS_ENCOUNTER_ID_TYPE")]
    encounter_id_type: Option<String>,
    /// Type tag for vendor-side identifiers
    #[arg(long, env = "PGS_RECORD_ID_TYPE")]
    record_id_type: Option<String>,
    /// `zero-is-unset` or `keep-zero`
    #[arg(long, env = "PGS_NUMERIC_POLICY")]
    numeric_policy: Option<String>,
}

impl ConfigArgs {
    fn resolve(&self) -> anyhow::Result<CoreConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return Ok(CoreConfig::from_yaml_str(&text)?);
        }

        let cfg = CoreConfig::from_values(
            required(&self.client_id, "--client-id")?,
            required(&self.patient_id_type, "--patient-id-type")?,
            required(&self.encounter_id_type, "--encounter-id-type")?,
            required(&self.record_id_type, "--record-id-type")?,
        )?;
        let policy = match &self.numeric_policy {
            Some(value) => value.parse::<NumericPolicy>()?,
            None => NumericPolicy::default(),
        };
        Ok(cfg.with_numeric_policy(policy))
    }
}

fn required<'a>(value: &'a Option<String>, flag: &str) -> anyhow::Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("{flag} is required unless --config is given"))
}

#[derive(Debug, Serialize)]
struct DocumentSummary {
    receipt_start: Option<String>,
    receipt_end: Option<String>,
    questions: usize,
    surveys: Vec<String>,
    records: usize,
    demographic_responses: usize,
    analysis_responses: usize,
    free_text_responses: usize,
    hcahps_responses: usize,
}

impl DocumentSummary {
    fn of(export: &SurveyExport) -> Self {
        let window = export.receipt_window.clone().unwrap_or_default();
        let surveys: BTreeSet<&str> = export
            .questions
            .iter()
            .map(|q| q.service.as_str())
            .collect();

        let mut summary = Self {
            receipt_start: window.start,
            receipt_end: window.end,
            questions: export.questions.len(),
            surveys: surveys.into_iter().map(str::to_string).collect(),
            records: export.records.len(),
            demographic_responses: 0,
            analysis_responses: 0,
            free_text_responses: 0,
            hcahps_responses: 0,
        };

        for record in &export.records {
            summary.demographic_responses += record.demographics.as_ref().map_or(0, Vec::len);
            summary.hcahps_responses += record.hcahps.as_ref().map_or(0, Vec::len);
            for entry in record.analysis.iter().flatten() {
                match entry {
                    AnalysisResponse::TextOnly(_) => summary.free_text_responses += 1,
                    AnalysisResponse::Structured(_) => summary.analysis_responses += 1,
                }
            }
        }

        summary
    }
}

fn sync(raw_dir: &Path, remote_dir: &Path) -> anyhow::Result<()> {
    let inbox = RawDataInbox::open(raw_dir)?;
    let remote = DirectorySource::new(remote_dir)?;

    let fetched = inbox.sync_from(&remote)?;
    if fetched.is_empty() {
        println!("No new exports.");
    }
    for file in fetched {
        println!(
            "{}  {}  {} bytes  {}",
            file.sha256,
            file.name.as_str(),
            file.size_bytes,
            file.fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pgs=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            config,
            raw_dir,
            data_dir,
            remote_dir,
        }) => {
            let cfg = Arc::new(config.resolve()?);
            tracing::info!("-- Starting PGS run for client {}", cfg.client_id());
            if let Some(remote_dir) = remote_dir {
                sync(&raw_dir, &remote_dir)?;
            }

            let inbox = RawDataInbox::open(&raw_dir)?;
            let mut sink = CsvSink::new(&data_dir)?;
            let summary = SurveyService::new(cfg).run(&inbox, &mut sink)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(Commands::Inspect { file }) => {
            let export = ExportDocument::read_file(&file)
                .with_context(|| format!("parsing {}", file.display()))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&DocumentSummary::of(&export))?
            );
        }
        Some(Commands::Sync {
            remote_dir,
            raw_dir,
        }) => sync(&raw_dir, &remote_dir)?,
        None => {
            println!("Use --help to see available commands.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use press_ganey::{PatientRecord, QuestionDefinition, ReceiptWindow, Response};

    fn config_args(args: &[&str]) -> ConfigArgs {
        let mut argv = vec!["pgs", "run"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).expect("valid arguments").command {
            Some(Commands::Run { config, .. }) => config,
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn resolves_config_from_flags() {
        let cfg = config_args(&[
            "--client-id",
            "4242",
            "--patient-id-type",
            "EhrMrn",
            "--encounter-id-type",
            "EhrCsn",
            "--record-id-type",
            "PressGaneyId",
            "--numeric-policy",
            "keep-zero",
        ])
        .resolve()
        .expect("config");

        assert_eq!(cfg.client_id(), "4242");
        assert_eq!(cfg.record_id_type(), "PressGaneyId");
        assert_eq!(cfg.numeric_policy(), NumericPolicy::KeepZero);
    }

    #[test]
    fn missing_flag_is_reported() {
        let args = ConfigArgs {
            config: None,
            client_id: Some("4242".into()),
            patient_id_type: None,
            encounter_id_type: Some("EhrCsn".into()),
            record_id_type: Some("PressGaneyId".into()),
            numeric_policy: None,
        };

        let err = args.resolve().expect_err("patient id type missing");
        assert!(err.to_string().contains("--patient-id-type"));
    }

    #[test]
    fn summarises_a_document() {
        let export = SurveyExport {
            receipt_window: Some(ReceiptWindow {
                start: Some("2019-01-01".into()),
                end: None,
            }),
            questions: vec![
                QuestionDefinition {
                    service: "SVC2".into(),
                    varname: "Q9".into(),
                    text: "Anything else?".into(),
                },
                QuestionDefinition {
                    service: "SVC1".into(),
                    varname: "Q1".into(),
                    text: "How satisfied were you?".into(),
                },
            ],
            records: vec![PatientRecord {
                survey_id: "900001".into(),
                service: "SVC1".into(),
                demographics: Some(vec![Response::new("ITMEDREC", "12345")]),
                analysis: Some(vec![
                    AnalysisResponse::Structured(Response::new("Q1", "5")),
                    AnalysisResponse::TextOnly("Great staff".into()),
                ]),
                ..PatientRecord::default()
            }],
        };

        let summary = DocumentSummary::of(&export);
        assert_eq!(summary.surveys, vec!["SVC1", "SVC2"]);
        assert_eq!(summary.receipt_start.as_deref(), Some("2019-01-01"));
        assert_eq!(summary.records, 1);
        assert_eq!(summary.demographic_responses, 1);
        assert_eq!(summary.analysis_responses, 1);
        assert_eq!(summary.free_text_responses, 1);
        assert_eq!(summary.hcahps_responses, 0);
    }
}

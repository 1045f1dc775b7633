use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgs_core::{CoreConfig, CsvSink, SurveyService, numeric_policy_from_env_value};
use pgs_files::{DirectorySource, RawDataInbox};

/// Batch entry point: fetch new exports, rebuild the tables, exit.
///
/// # Environment Variables
/// - `PGS_CLIENT_ID`: vendor client number used in answer identifiers (required)
/// - `PGS_PATIENT_ID_TYPE`: type tag for patient chart numbers (required)
/// - `PGS_ENCOUNTER_ID_TYPE`: type tag for encounter numbers (required)
/// - `PGS_RECORD_ID_TYPE`: type tag for vendor-side identifiers (required)
/// - `PGS_NUMERIC_POLICY`: `zero-is-unset` (default) or `keep-zero`
/// - `PGS_RAW_DIR`: inbox of export documents (default: "rawdata")
/// - `PGS_DATA_DIR`: output directory for the CSV tables (default: "data")
/// - `PGS_REMOTE_DIR`: drop directory to fetch new exports from (optional)
///
/// # Errors
/// Returns an error if configuration is missing or invalid, the remote fetch fails, or the
/// tables cannot be written. Individual unreadable documents are logged and skipped.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pgs=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(config_from_env()?);

    let raw_dir =
        std::env::var("PGS_RAW_DIR").unwrap_or_else(|_| pgs_core::DEFAULT_RAW_DATA_DIR.into());
    let data_dir =
        std::env::var("PGS_DATA_DIR").unwrap_or_else(|_| pgs_core::DEFAULT_DATA_DIR.into());

    tracing::info!("-- Starting PGS run for client {}", cfg.client_id());

    let inbox = RawDataInbox::open(Path::new(&raw_dir))?;

    if let Ok(remote_dir) = std::env::var("PGS_REMOTE_DIR") {
        let remote = DirectorySource::new(Path::new(&remote_dir))?;
        let fetched = inbox.sync_from(&remote)?;
        tracing::info!("fetched {} new exports from {}", fetched.len(), remote_dir);
    }

    let mut sink = CsvSink::new(Path::new(&data_dir))?;
    let summary = SurveyService::new(cfg).run(&inbox, &mut sink)?;

    tracing::info!("run summary: {}", serde_json::to_string(&summary)?);

    Ok(())
}

fn config_from_env() -> anyhow::Result<CoreConfig> {
    let cfg = CoreConfig::from_values(
        &required_env("PGS_CLIENT_ID")?,
        &required_env("PGS_PATIENT_ID_TYPE")?,
        &required_env("PGS_ENCOUNTER_ID_TYPE")?,
        &required_env("PGS_RECORD_ID_TYPE")?,
    )?;
    let numeric_policy = numeric_policy_from_env_value(std::env::var("PGS_NUMERIC_POLICY").ok())?;

    Ok(cfg.with_numeric_policy(numeric_policy))
}

fn required_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{name} must be set"))
}

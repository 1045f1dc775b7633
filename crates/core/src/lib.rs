//! # PGS Core
//!
//! Core business logic for turning patient satisfaction survey exports into flat tables.
//!
//! This crate contains the pure transformation and the table writers:
//! - Question extraction from each document's question map (first definition wins)
//! - Answer extraction from per-patient records (last answer wins)
//! - Survey derivation and the denormalized answer/question export
//! - CSV output under the configured data directory
//!
//! **No transport concerns**: fetching files from the vendor belongs in `pgs_files`, and
//! parsing the XML wire format belongs in `press_ganey`.

pub mod answers;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod identity;
pub mod model;
pub mod questions;
pub mod registry;
pub mod service;
pub mod sink;
pub mod surveys;

pub use catalog::{IngestStats, SurveyCatalog};
pub use config::{numeric_policy_from_env_value, CoreConfig, NumericPolicy};
pub use constants::{DEFAULT_DATA_DIR, DEFAULT_RAW_DATA_DIR};
pub use error::{SurveyError, SurveyResult};
pub use export::ExportTables;
pub use model::{ExportRow, Survey, SurveyAnswer, SurveyQuestion};
pub use service::{DocumentLoad, LoadedDocument, RejectedDocument, RunSummary, SurveyService};
pub use sink::{CsvSink, TableSink};

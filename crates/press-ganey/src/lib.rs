//! Press Ganey export wire/boundary support.
//!
//! This crate provides **wire models** and **translation helpers** for patient-satisfaction
//! survey export files (`DATA_EXPORT` XML documents):
//! - strict parsing of the handful of sections the pipeline needs
//! - tolerant handling of everything else (unknown elements are ignored)
//! - translation from the wire shape into domain-level document types
//!
//! Repeated elements (`QUESTION`, `PATIENTLEVELDATA`, `RESPONSE`) deserialise to lists
//! whether the file carries one occurrence or many.

pub mod export;

// Re-export facade
pub use export::ExportDocument;

// Re-export public domain-level types
pub use export::{
    AnalysisResponse, PatientRecord, QuestionDefinition, ReceiptWindow, Response, SurveyExport,
};

/// Errors returned by the `press_ganey` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum PressGaneyError {
    #[error("invalid XML: {0}")]
    InvalidXml(#[from] quick_xml::DeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required section: {0}")]
    MissingSection(&'static str),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`PressGaneyError`].
pub type PressGaneyResult<T> = Result<T, PressGaneyError>;

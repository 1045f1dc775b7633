//! Run orchestration: load the inbox, fold documents into a catalog, write the tables.

use crate::catalog::SurveyCatalog;
use crate::config::CoreConfig;
use crate::sink::TableSink;
use crate::surveys::derive_surveys;
use crate::{SurveyError, SurveyResult};
use pgs_files::RawDataInbox;
use press_ganey::{ExportDocument, SurveyExport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A parsed document and where it came from.
#[derive(Clone, Debug)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub export: SurveyExport,
}

/// A document that could not be read or parsed.
#[derive(Clone, Debug, Serialize)]
pub struct RejectedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading every document in the inbox.
#[derive(Clone, Debug, Default)]
pub struct DocumentLoad {
    pub documents: Vec<LoadedDocument>,
    pub rejected: Vec<RejectedDocument>,
}

/// Counts reported at the end of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub documents_loaded: usize,
    pub documents_rejected: usize,
    pub records: usize,
    pub surveys: usize,
    pub questions: usize,
    pub questions_skipped: usize,
    pub answers: usize,
    pub answers_replaced: usize,
    pub dangling_answers: usize,
}

/// Survey pipeline operations bound to one configuration.
#[derive(Clone, Debug)]
pub struct SurveyService {
    cfg: Arc<CoreConfig>,
}

impl SurveyService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Read and parse one export document.
    pub fn load_document(path: &Path) -> SurveyResult<SurveyExport> {
        ExportDocument::read_file(path).map_err(|source| SurveyError::DocumentRejected {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse every document in the inbox, in file-name order.
    ///
    /// A document that fails to read or parse is logged and set aside; the rest still load.
    /// Only a failure to list the inbox itself is an error.
    pub fn load_documents(&self, inbox: &RawDataInbox) -> SurveyResult<DocumentLoad> {
        let mut load = DocumentLoad::default();

        for path in inbox.list_documents()? {
            match Self::load_document(&path) {
                Ok(export) => {
                    tracing::debug!(
                        "loaded {} ({} questions, {} records)",
                        path.display(),
                        export.questions.len(),
                        export.records.len()
                    );
                    load.documents.push(LoadedDocument { path, export });
                }
                Err(err) => {
                    tracing::warn!("{}", err);
                    load.rejected.push(RejectedDocument {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "loaded {} documents from {} ({} rejected)",
            load.documents.len(),
            inbox.dir().display(),
            load.rejected.len()
        );
        Ok(load)
    }

    /// Fold `documents` into a catalog, in the order given.
    pub fn transform(&self, documents: &[LoadedDocument]) -> (SurveyCatalog, RunSummary) {
        let mut catalog = SurveyCatalog::new();
        let mut summary = RunSummary {
            documents_loaded: documents.len(),
            ..RunSummary::default()
        };

        for document in documents {
            let stats = catalog.ingest(&document.export, &self.cfg);
            tracing::debug!(
                "{}: {} records, {} new questions, {} new answers, {} replaced",
                document.path.display(),
                stats.records,
                stats.questions.inserted,
                stats.answers.inserted,
                stats.answers.replaced
            );

            summary.records += stats.records;
            summary.questions_skipped += stats.questions.skipped;
            summary.answers_replaced += stats.answers.replaced;
        }

        summary.surveys = derive_surveys(catalog.questions(), &self.cfg).len();
        summary.questions = catalog.questions().len();
        summary.answers = catalog.answers().len();
        summary.dangling_answers = catalog.dangling_answers();

        (catalog, summary)
    }

    /// Load, transform and write one full run.
    pub fn run(&self, inbox: &RawDataInbox, sink: &mut dyn TableSink) -> SurveyResult<RunSummary> {
        let load = self.load_documents(inbox)?;
        let (catalog, mut summary) = self.transform(&load.documents);
        summary.documents_rejected = load.rejected.len();

        sink.write_tables(&catalog.tables(&self.cfg))?;

        tracing::info!(
            "run complete: {} documents, {} records, {} surveys, {} questions, {} answers",
            summary.documents_loaded,
            summary.records,
            summary.surveys,
            summary.questions,
            summary.answers
        );
        Ok(summary)
    }
}

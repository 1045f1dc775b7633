//! The accumulated state of a run.
//!
//! A [`SurveyCatalog`] holds the question and answer registries. Documents are folded into it
//! one at a time, in processing order; the survey and export tables are derived from the
//! final catalog.

use crate::answers::{extract_answers, AnswerStats};
use crate::config::CoreConfig;
use crate::export::{compose_export, ExportTables};
use crate::questions::{extract_questions, QuestionStats};
use crate::registry::{AnswerRegistry, QuestionRegistry};
use crate::surveys::derive_surveys;
use press_ganey::SurveyExport;

/// Counts from ingesting one document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    pub questions: QuestionStats,
    pub answers: AnswerStats,
}

#[derive(Clone, Debug, Default)]
pub struct SurveyCatalog {
    questions: QuestionRegistry,
    answers: AnswerRegistry,
}

impl SurveyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `documents` into a fresh catalog, in iteration order.
    pub fn from_documents<'a, I>(documents: I, cfg: &CoreConfig) -> Self
    where
        I: IntoIterator<Item = &'a SurveyExport>,
    {
        documents
            .into_iter()
            .fold(Self::new(), |mut catalog, document| {
                catalog.ingest(document, cfg);
                catalog
            })
    }

    /// Ingest one document: its question map first, then every per-patient record.
    pub fn ingest(&mut self, document: &SurveyExport, cfg: &CoreConfig) -> IngestStats {
        let questions = extract_questions(&mut self.questions, &document.questions, cfg);

        let mut answers = AnswerStats::default();
        for record in &document.records {
            let stats = extract_answers(&mut self.answers, record, cfg);
            answers.inserted += stats.inserted;
            answers.replaced += stats.replaced;
        }

        IngestStats {
            records: document.records.len(),
            questions,
            answers,
        }
    }

    pub fn questions(&self) -> &QuestionRegistry {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerRegistry {
        &self.answers
    }

    /// Number of answers whose question is not in the question registry.
    pub fn dangling_answers(&self) -> usize {
        self.answers
            .iter()
            .filter(|answer| !self.questions.contains(&answer.survey_question_id))
            .count()
    }

    /// Build all four output tables from the current registries.
    pub fn tables(&self, cfg: &CoreConfig) -> ExportTables {
        ExportTables {
            surveys: derive_surveys(&self.questions, cfg),
            questions: self.questions.iter().cloned().collect(),
            answers: self.answers.iter().cloned().collect(),
            alldata: compose_export(&self.answers, &self.questions),
        }
    }
}

//! Output sinks for the export tables.
//!
//! The pipeline only depends on [`TableSink`]. [`CsvSink`] writes one CSV file per table with
//! a header row, minimal quoting and `\n` line endings; unset values are empty fields.

use crate::constants::{ALLDATA_FILENAME, ANSWERS_FILENAME, QUESTIONS_FILENAME, SURVEYS_FILENAME};
use crate::export::ExportTables;
use crate::{SurveyError, SurveyResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SURVEY_COLUMNS: [&str; 3] = ["Id", "IdType", "Name"];

pub const QUESTION_COLUMNS: [&str; 9] = [
    "Id",
    "IdType",
    "SurveyId",
    "SurveyIdType",
    "Name",
    "Text",
    "ResponseType",
    "AcceptableResponse",
    "ClientId",
];

pub const ANSWER_COLUMNS: [&str; 21] = [
    "Id",
    "IdType",
    "PatientId",
    "PatientIdType",
    "ProviderId",
    "ProviderIdType",
    "LocationId",
    "LocationIdType",
    "EncounterId",
    "EncounterIdType",
    "AccountId",
    "AccountIdType",
    "SurveyId",
    "SurveyIdType",
    "SurveyQuestionId",
    "SurveyQuestionIdType",
    "ResponseDate",
    "EncounterDate",
    "Response",
    "ResponseNumeric",
    "ClientId",
];

pub const ALLDATA_COLUMNS: [&str; 25] = [
    "ClientId",
    "AnswerId",
    "AnswerIdType",
    "PatientId",
    "PatientIdType",
    "ProviderId",
    "ProviderIdType",
    "SurveyId",
    "SurveyIdType",
    "QuestionId",
    "QuestionIdType",
    "QuestionName",
    "QuestionText",
    "ResponseType",
    "AcceptableResponse",
    "LocationId",
    "LocationIdType",
    "EncounterId",
    "EncounterIdType",
    "EncounterDate",
    "AccountId",
    "AccountIdType",
    "ResponseDate",
    "Response",
    "ResponseNumeric",
];

/// Destination for the tables of a run.
pub trait TableSink {
    fn write_tables(&mut self, tables: &ExportTables) -> SurveyResult<()>;
}

/// Writes `surveys.csv`, `questions.csv`, `answers.csv` and `alldata.csv` into a directory.
#[derive(Debug)]
pub struct CsvSink {
    data_dir: PathBuf,
}

impl CsvSink {
    /// Create a sink writing into `data_dir`, creating the directory if needed.
    pub fn new(data_dir: &Path) -> SurveyResult<Self> {
        fs::create_dir_all(data_dir).map_err(SurveyError::OutputDirCreation)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn write_table<T: Serialize>(
        &self,
        table: &'static str,
        columns: &[&str],
        rows: &[T],
    ) -> SurveyResult<()> {
        let csv_err = |source: csv::Error| SurveyError::Csv { table, source };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(self.data_dir.join(table))
            .map_err(csv_err)?;

        writer.write_record(columns).map_err(csv_err)?;
        for row in rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| csv_err(csv::Error::from(e)))?;

        tracing::debug!("wrote {} rows to {}", rows.len(), table);
        Ok(())
    }
}

impl TableSink for CsvSink {
    fn write_tables(&mut self, tables: &ExportTables) -> SurveyResult<()> {
        self.write_table(SURVEYS_FILENAME, &SURVEY_COLUMNS, &tables.surveys)?;
        self.write_table(QUESTIONS_FILENAME, &QUESTION_COLUMNS, &tables.questions)?;
        self.write_table(ANSWERS_FILENAME, &ANSWER_COLUMNS, &tables.answers)?;
        self.write_table(ALLDATA_FILENAME, &ALLDATA_COLUMNS, &tables.alldata)?;

        tracing::info!(
            "wrote {} surveys, {} questions, {} answers to {}",
            tables.surveys.len(),
            tables.questions.len(),
            tables.answers.len(),
            self.data_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SurveyCatalog;
    use crate::test_support::{test_cfg, DOC_A, DOC_B};
    use press_ganey::ExportDocument;
    use tempfile::TempDir;

    fn write_sample(dir: &Path) {
        let cfg = test_cfg();
        let a = ExportDocument::parse(DOC_A).expect("doc A");
        let b = ExportDocument::parse(DOC_B).expect("doc B");
        let tables = SurveyCatalog::from_documents([&a, &b], &cfg).tables(&cfg);

        let mut sink = CsvSink::new(dir).expect("create sink");
        sink.write_tables(&tables).expect("write tables");
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .expect("read table")
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn writes_all_four_tables_with_headers() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_sample(temp_dir.path());

        for (file, columns) in [
            (SURVEYS_FILENAME, &SURVEY_COLUMNS[..]),
            (QUESTIONS_FILENAME, &QUESTION_COLUMNS[..]),
            (ANSWERS_FILENAME, &ANSWER_COLUMNS[..]),
            (ALLDATA_FILENAME, &ALLDATA_COLUMNS[..]),
        ] {
            let lines = read_lines(&temp_dir.path().join(file));
            assert_eq!(lines[0], columns.join(","), "{file}");
        }
    }

    #[test]
    fn serialised_rows_match_column_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_sample(temp_dir.path());

        let surveys = read_lines(&temp_dir.path().join(SURVEYS_FILENAME));
        assert_eq!(surveys[1..], ["SVC1,PressGaneyId,SVC1", "SVC2,PressGaneyId,SVC2"]);

        let questions = read_lines(&temp_dir.path().join(QUESTIONS_FILENAME));
        assert_eq!(
            questions[1],
            "SVC1|Q1,PressGaneyId,SVC1,PressGaneyId,Q1,How satisfied were you?,,,4242"
        );

        let answers = read_lines(&temp_dir.path().join(ANSWERS_FILENAME));
        assert_eq!(
            answers[4],
            "4242|900001|SVC1|Q1,PressGaneyId,12345,EhrMrn,,,,,E-77,EhrCsn,,,SVC1,PressGaneyId,\
             SVC1|Q1,PressGaneyId,2019-02-01,2019-01-01,4,4,4242"
        );

        let alldata = read_lines(&temp_dir.path().join(ALLDATA_FILENAME));
        assert_eq!(
            alldata[4],
            "4242,4242|900001|SVC1|Q1,PressGaneyId,12345,EhrMrn,,,SVC1,PressGaneyId,\
             SVC1|Q1,PressGaneyId,Q1,How satisfied were you?,,,,,E-77,EhrCsn,2019-01-01,,,\
             2019-02-01,4,4"
        );
    }

    #[test]
    fn empty_tables_still_get_headers() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = CsvSink::new(&temp_dir.path().join("nested/data")).expect("create sink");
        sink.write_tables(&ExportTables::default())
            .expect("write empty tables");

        let lines = read_lines(&temp_dir.path().join("nested/data").join(ANSWERS_FILENAME));
        assert_eq!(lines, vec![ANSWER_COLUMNS.join(",")]);
    }
}

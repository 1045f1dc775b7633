//! `DATA_EXPORT` wire models and translation helpers.
//!
//! Responsibilities:
//! - Define public domain-level types for one parsed export file
//! - Define a wire model matching the XML element names
//! - Translate the wire model into domain types, enforcing the required sections
//!
//! Notes:
//! - Only `HEADER` and `HEADER/QUESTION_MAP` are required. Everything below them is optional
//!   and missing text fields translate to empty strings.
//! - Response sections keep the distinction between "absent" (`None`) and "present but
//!   empty" (`Some(vec![])`).

use crate::{PressGaneyError, PressGaneyResult};
use quick_xml::events::Event;
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Public domain-level types
// ============================================================================

/// One parsed export file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurveyExport {
    /// Receipt window declared in the header, if any.
    pub receipt_window: Option<ReceiptWindow>,

    /// Question map declared once per document.
    pub questions: Vec<QuestionDefinition>,

    /// Per-patient survey records, in document order.
    pub records: Vec<PatientRecord>,
}

/// Header receipt window (`HEADER/RECDATE`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiptWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A question map entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionDefinition {
    /// Service (survey) code.
    pub service: String,
    /// Variable name of the question within the survey.
    pub varname: String,
    /// Free-text wording.
    pub text: String,
}

/// One survey response instance tied to a single patient encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientRecord {
    pub survey_id: String,

    /// Client number as written by the vendor. Informational only; answer identifiers use the
    /// configured client id.
    pub client_id: Option<String>,

    pub service: String,

    /// Record-level receipt date (`RECDATE`).
    pub received_date: String,

    /// Discharge date (`DISDATE`), when supplied.
    pub discharge_date: Option<String>,

    pub demographics: Option<Vec<Response>>,
    pub analysis: Option<Vec<AnalysisResponse>>,
    pub hcahps: Option<Vec<Response>>,
}

/// A `{VARNAME, VALUE}` response entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub varname: String,
    pub value: String,
}

impl Response {
    pub fn new(varname: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            varname: varname.into(),
            value: value.into(),
        }
    }
}

/// An `ANALYSIS` response entry, which is either bare text or a structured pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisResponse {
    /// Free text whose question variable name is unknown.
    TextOnly(String),
    /// A regular `{VARNAME, VALUE}` entry.
    Structured(Response),
}

// ============================================================================
// Public ExportDocument operations
// ============================================================================

/// Export document operations.
///
/// This is a zero-sized type used for namespacing parsing operations.
pub struct ExportDocument;

impl ExportDocument {
    /// Parse an export document from XML text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort path (e.g.
    /// `PATIENTLEVELDATA.ANALYSIS`) to the failing element when the XML does not match the
    /// wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`PressGaneyError`] if:
    /// - the text is not well-formed XML ([`PressGaneyError::InvalidXml`]),
    /// - a known element has an unexpected shape ([`PressGaneyError::Translation`]),
    /// - the root element is not `DATA_EXPORT`, or `HEADER` or `HEADER/QUESTION_MAP` is
    ///   missing ([`PressGaneyError::MissingSection`]).
    pub fn parse(xml_text: &str) -> PressGaneyResult<SurveyExport> {
        let mut deserializer = quick_xml::de::Deserializer::from_str(xml_text);

        let wire = match serde_path_to_error::deserialize::<_, DataExportWire>(&mut deserializer)
        {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                if path.is_empty() || path == "." {
                    return Err(PressGaneyError::InvalidXml(source));
                }
                return Err(PressGaneyError::Translation(format!(
                    "DATA_EXPORT schema mismatch at {path}: {source}"
                )));
            }
        };

        ensure_root_element(xml_text)?;
        wire_to_domain(wire)
    }

    /// Read and parse an export document from disk.
    pub fn read_file(path: &Path) -> PressGaneyResult<SurveyExport> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct DataExportWire {
    #[serde(rename = "HEADER")]
    header: Option<HeaderWire>,

    #[serde(rename = "PATIENTLEVELDATA", default)]
    patient_level_data: Vec<PatientLevelDataWire>,
}

#[derive(Debug, Deserialize)]
struct HeaderWire {
    #[serde(rename = "RECDATE")]
    recdate: Option<RecDateWire>,

    #[serde(rename = "QUESTION_MAP")]
    question_map: Option<QuestionMapWire>,
}

#[derive(Debug, Deserialize)]
struct RecDateWire {
    #[serde(rename = "START")]
    start: Option<String>,

    #[serde(rename = "END")]
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionMapWire {
    #[serde(rename = "QUESTION", default)]
    questions: Vec<QuestionWire>,
}

#[derive(Debug, Deserialize)]
struct QuestionWire {
    #[serde(rename = "SERVICE")]
    service: Option<String>,

    #[serde(rename = "VARNAME")]
    varname: Option<String>,

    #[serde(rename = "QUESTION_TEXT")]
    question_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PatientLevelDataWire {
    #[serde(rename = "SURVEY_ID")]
    survey_id: Option<String>,

    #[serde(rename = "CLIENT_ID")]
    client_id: Option<String>,

    #[serde(rename = "SERVICE")]
    service: Option<String>,

    #[serde(rename = "RECDATE")]
    recdate: Option<String>,

    #[serde(rename = "DISDATE")]
    disdate: Option<String>,

    #[serde(rename = "DEMOGRAPHICS")]
    demographics: Option<ResponsesWire>,

    #[serde(rename = "ANALYSIS")]
    analysis: Option<AnalysisWire>,

    #[serde(rename = "HCAHPS")]
    hcahps: Option<ResponsesWire>,
}

#[derive(Debug, Deserialize)]
struct ResponsesWire {
    #[serde(rename = "RESPONSE", default)]
    responses: Vec<ResponseWire>,
}

#[derive(Debug, Deserialize)]
struct ResponseWire {
    #[serde(rename = "VARNAME")]
    varname: Option<String>,

    #[serde(rename = "VALUE")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalysisWire {
    #[serde(rename = "RESPONSE", default)]
    responses: Vec<AnalysisResponseWire>,
}

/// `ANALYSIS/RESPONSE` is either `<RESPONSE>text</RESPONSE>` or carries `VARNAME`/`VALUE`
/// children, so both shapes are accepted here and split during translation.
#[derive(Debug, Deserialize)]
struct AnalysisResponseWire {
    #[serde(rename = "$text")]
    text: Option<String>,

    #[serde(rename = "VARNAME")]
    varname: Option<String>,

    #[serde(rename = "VALUE")]
    value: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

const ROOT_ELEMENT: &str = "DATA_EXPORT";

/// The deserializer accepts any root name, so the first element is checked separately.
fn ensure_root_element(xml_text: &str) -> PressGaneyResult<()> {
    let mut reader = quick_xml::Reader::from_str(xml_text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                if element.name().as_ref() == ROOT_ELEMENT.as_bytes() {
                    return Ok(());
                }
                return Err(PressGaneyError::MissingSection(ROOT_ELEMENT));
            }
            Ok(Event::Eof) => return Err(PressGaneyError::MissingSection(ROOT_ELEMENT)),
            Ok(_) => {}
            Err(err) => {
                return Err(PressGaneyError::InvalidXml(quick_xml::DeError::InvalidXml(
                    err,
                )))
            }
        }
    }
}

fn wire_to_domain(wire: DataExportWire) -> PressGaneyResult<SurveyExport> {
    let header = wire
        .header
        .ok_or(PressGaneyError::MissingSection("HEADER"))?;
    let question_map = header
        .question_map
        .ok_or(PressGaneyError::MissingSection("HEADER/QUESTION_MAP"))?;

    let receipt_window = header.recdate.map(|r| ReceiptWindow {
        start: r.start,
        end: r.end,
    });

    let questions = question_map
        .questions
        .into_iter()
        .map(|q| QuestionDefinition {
            service: q.service.unwrap_or_default(),
            varname: q.varname.unwrap_or_default(),
            text: q.question_text.unwrap_or_default(),
        })
        .collect();

    let records = wire
        .patient_level_data
        .into_iter()
        .map(record_to_domain)
        .collect();

    Ok(SurveyExport {
        receipt_window,
        questions,
        records,
    })
}

fn record_to_domain(wire: PatientLevelDataWire) -> PatientRecord {
    PatientRecord {
        survey_id: wire.survey_id.unwrap_or_default(),
        client_id: wire.client_id,
        service: wire.service.unwrap_or_default(),
        received_date: wire.recdate.unwrap_or_default(),
        discharge_date: wire.disdate,
        demographics: wire.demographics.map(responses_to_domain),
        analysis: wire.analysis.map(|a| {
            a.responses
                .into_iter()
                .filter_map(analysis_response_to_domain)
                .collect()
        }),
        hcahps: wire.hcahps.map(responses_to_domain),
    }
}

fn responses_to_domain(wire: ResponsesWire) -> Vec<Response> {
    wire.responses
        .into_iter()
        .map(|r| Response {
            varname: r.varname.unwrap_or_default(),
            value: r.value.unwrap_or_default(),
        })
        .collect()
}

fn analysis_response_to_domain(wire: AnalysisResponseWire) -> Option<AnalysisResponse> {
    if wire.varname.is_some() || wire.value.is_some() {
        return Some(AnalysisResponse::Structured(Response {
            varname: wire.varname.unwrap_or_default(),
            value: wire.value.unwrap_or_default(),
        }));
    }

    match wire.text {
        Some(text) if !text.trim().is_empty() => Some(AnalysisResponse::TextOnly(text)),
        _ => {
            tracing::debug!("dropping empty ANALYSIS response entry");
            None
        }
    }
}

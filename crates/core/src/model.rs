//! Flat, relational records produced by the pipeline.
//!
//! Field order matches the column order of the written tables; the serde names are the
//! column headers.

use pgs_types::CompositeId;
use serde::Serialize;

/// A survey inferred from the question map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Survey {
    pub id: String,
    pub id_type: String,
    /// The source never names surveys, so this is the survey code.
    pub name: String,
    #[serde(skip)]
    pub survey_type: Option<String>,
    #[serde(skip)]
    pub description: Option<String>,
    #[serde(skip)]
    pub client_id: String,
}

/// A question definition, unique per `(survey_code, variable_name)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SurveyQuestion {
    pub id: CompositeId,
    pub id_type: String,
    pub survey_id: String,
    pub survey_id_type: String,
    pub name: String,
    pub text: String,
    /// Reserved for manual enrichment downstream.
    pub response_type: Option<String>,
    /// Reserved for manual enrichment downstream.
    pub acceptable_response: Option<String>,
    pub client_id: String,
}

/// One question-answer response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SurveyAnswer {
    pub id: CompositeId,
    pub id_type: String,
    pub patient_id: String,
    pub patient_id_type: String,
    pub provider_id: Option<String>,
    pub provider_id_type: Option<String>,
    pub location_id: Option<String>,
    pub location_id_type: Option<String>,
    pub encounter_id: String,
    pub encounter_id_type: String,
    pub account_id: Option<String>,
    pub account_id_type: Option<String>,
    pub survey_id: String,
    pub survey_id_type: String,
    pub survey_question_id: CompositeId,
    pub survey_question_id_type: String,
    pub response_date: String,
    pub encounter_date: String,
    pub response: String,
    pub response_numeric: Option<i64>,
    pub client_id: String,
}

/// One row of the denormalized export: an answer joined with its question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    pub client_id: String,
    pub answer_id: CompositeId,
    pub answer_id_type: String,
    pub patient_id: String,
    pub patient_id_type: String,
    pub provider_id: Option<String>,
    pub provider_id_type: Option<String>,
    pub survey_id: String,
    pub survey_id_type: String,
    pub question_id: CompositeId,
    pub question_id_type: String,
    pub question_name: String,
    pub question_text: String,
    pub response_type: String,
    pub acceptable_response: String,
    pub location_id: Option<String>,
    pub location_id_type: Option<String>,
    pub encounter_id: String,
    pub encounter_id_type: String,
    pub encounter_date: String,
    pub account_id: Option<String>,
    pub account_id_type: Option<String>,
    pub response_date: String,
    pub response: String,
    pub response_numeric: Option<i64>,
}

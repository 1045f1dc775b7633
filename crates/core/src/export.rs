//! Denormalized export: every answer joined with its question.

use crate::model::{ExportRow, Survey, SurveyAnswer, SurveyQuestion};
use crate::registry::{AnswerRegistry, QuestionRegistry};

/// All four output tables of a run.
#[derive(Clone, Debug, Default)]
pub struct ExportTables {
    pub surveys: Vec<Survey>,
    pub questions: Vec<SurveyQuestion>,
    pub answers: Vec<SurveyAnswer>,
    pub alldata: Vec<ExportRow>,
}

/// One row per answer, in answer registry order.
///
/// An answer whose question was never registered still produces a row; its question name,
/// text, response type and acceptable response are empty.
pub fn compose_export(answers: &AnswerRegistry, questions: &QuestionRegistry) -> Vec<ExportRow> {
    let mut dangling = 0usize;

    let rows = answers
        .iter()
        .map(|answer| {
            let question = questions.get(&answer.survey_question_id);
            if question.is_none() {
                dangling += 1;
            }
            export_row(answer, question)
        })
        .collect();

    if dangling > 0 {
        tracing::info!("{} answers reference unregistered questions", dangling);
    }

    rows
}

fn export_row(answer: &SurveyAnswer, question: Option<&SurveyQuestion>) -> ExportRow {
    let (question_name, question_text, response_type, acceptable_response) = match question {
        Some(q) => (
            q.name.clone(),
            q.text.clone(),
            q.response_type.clone().unwrap_or_default(),
            q.acceptable_response.clone().unwrap_or_default(),
        ),
        None => Default::default(),
    };

    ExportRow {
        client_id: answer.client_id.clone(),
        answer_id: answer.id.clone(),
        answer_id_type: answer.id_type.clone(),
        patient_id: answer.patient_id.clone(),
        patient_id_type: answer.patient_id_type.clone(),
        provider_id: answer.provider_id.clone(),
        provider_id_type: answer.provider_id_type.clone(),
        survey_id: answer.survey_id.clone(),
        survey_id_type: answer.survey_id_type.clone(),
        question_id: answer.survey_question_id.clone(),
        question_id_type: answer.survey_question_id_type.clone(),
        question_name,
        question_text,
        response_type,
        acceptable_response,
        location_id: answer.location_id.clone(),
        location_id_type: answer.location_id_type.clone(),
        encounter_id: answer.encounter_id.clone(),
        encounter_id_type: answer.encounter_id_type.clone(),
        encounter_date: answer.encounter_date.clone(),
        account_id: answer.account_id.clone(),
        account_id_type: answer.account_id_type.clone(),
        response_date: answer.response_date.clone(),
        response: answer.response.clone(),
        response_numeric: answer.response_numeric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::extract_answers;
    use crate::questions::extract_questions;
    use crate::test_support::test_cfg;
    use press_ganey::{AnalysisResponse, PatientRecord, QuestionDefinition, Response};

    fn registries() -> (QuestionRegistry, AnswerRegistry) {
        let cfg = test_cfg();
        let mut questions = QuestionRegistry::new();
        let mut answers = AnswerRegistry::new();

        extract_questions(
            &mut questions,
            &[QuestionDefinition {
                service: "SVC1".into(),
                varname: "Q1".into(),
                text: "How satisfied were you?".into(),
            }],
            &cfg,
        );

        let record = PatientRecord {
            survey_id: "900001".into(),
            service: "SVC1".into(),
            received_date: "2019-01-15".into(),
            demographics: Some(vec![Response::new("ITMEDREC", "12345")]),
            analysis: Some(vec![
                AnalysisResponse::Structured(Response::new("Q1", "5")),
                AnalysisResponse::TextOnly("Loved it".into()),
            ]),
            ..PatientRecord::default()
        };
        extract_answers(&mut answers, &record, &cfg);

        (questions, answers)
    }

    #[test]
    fn one_row_per_answer_in_registry_order() {
        let (questions, answers) = registries();
        let rows = compose_export(&answers, &questions);

        let ids: Vec<&str> = rows.iter().map(|r| r.answer_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "4242|900001|SVC1|ITMEDREC",
                "4242|900001|SVC1|Q1",
                "4242|900001|SVC1|Loved it",
            ]
        );
    }

    #[test]
    fn joins_question_fields() {
        let (questions, answers) = registries();
        let rows = compose_export(&answers, &questions);

        let row = &rows[1];
        assert_eq!(row.question_id.as_str(), "SVC1|Q1");
        assert_eq!(row.question_name, "Q1");
        assert_eq!(row.question_text, "How satisfied were you?");
        assert_eq!(row.response_type, "");
        assert_eq!(row.acceptable_response, "");
        assert_eq!(row.patient_id, "12345");
        assert_eq!(row.response, "5");
        assert_eq!(row.response_numeric, Some(5));
        assert_eq!(row.client_id, "4242");
    }

    #[test]
    fn dangling_references_still_produce_rows() {
        let (questions, answers) = registries();
        let rows = compose_export(&answers, &questions);

        let row = &rows[2];
        assert_eq!(row.question_id.as_str(), "SVC1|Loved it");
        assert_eq!(row.question_name, "");
        assert_eq!(row.question_text, "");
        assert_eq!(row.response_type, "");
        assert_eq!(row.acceptable_response, "");
        assert_eq!(row.response, "Loved it");
    }
}

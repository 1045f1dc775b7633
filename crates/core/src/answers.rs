//! Answer extraction from per-patient records.
//!
//! Each record carries up to three response sections (demographics, analysis, HCAHPS). Every
//! answer produced from a record shares the record's context: patient chart number, encounter
//! number and admission date, all taken from the demographics section.
//!
//! All sections feed one [`AnswerRegistry`], so a later answer with the same identifier
//! replaces an earlier one regardless of which section produced it.

use crate::config::CoreConfig;
use crate::constants::{
    ADMIT_DATE_VARNAME, ENCOUNTER_VARNAME, HCAHPS_ANSWER_ID_TYPE, PATIENT_CHART_VARNAME,
};
use crate::identity::{answer_id, question_id};
use crate::model::SurveyAnswer;
use crate::registry::{AnswerRegistry, Placement};
use press_ganey::{AnalysisResponse, PatientRecord, Response};

/// Values shared by every answer of one per-patient record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordContext {
    pub patient_id: String,
    pub encounter_id: String,
    pub admit_date: String,
}

impl RecordContext {
    /// Scan the demographics section for the well-known context variables.
    ///
    /// Absent variables, or an absent section, leave the value empty. If a variable repeats,
    /// the last occurrence is used.
    pub fn from_demographics(demographics: Option<&[Response]>) -> Self {
        let mut ctx = Self::default();
        for response in demographics.unwrap_or_default() {
            match response.varname.as_str() {
                PATIENT_CHART_VARNAME => ctx.patient_id = response.value.clone(),
                ENCOUNTER_VARNAME => ctx.encounter_id = response.value.clone(),
                ADMIT_DATE_VARNAME => ctx.admit_date = response.value.clone(),
                _ => {}
            }
        }
        ctx
    }
}

/// Counts from one answer extraction pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnswerStats {
    pub inserted: usize,
    pub replaced: usize,
}

impl AnswerStats {
    fn record(&mut self, placement: Placement) {
        match placement {
            Placement::Inserted => self.inserted += 1,
            Placement::Replaced => self.replaced += 1,
        }
    }
}

/// Extract every answer of `record` into `registry`.
pub fn extract_answers(
    registry: &mut AnswerRegistry,
    record: &PatientRecord,
    cfg: &CoreConfig,
) -> AnswerStats {
    let ctx = RecordContext::from_demographics(record.demographics.as_deref());
    let builder = AnswerBuilder { record, ctx: &ctx, cfg };
    let mut stats = AnswerStats::default();

    if let Some(demographics) = &record.demographics {
        for response in demographics {
            let answer = builder.build(
                &response.varname,
                &response.value,
                None,
                cfg.record_id_type(),
            );
            stats.record(registry.insert(answer));
        }
    }

    if let Some(analysis) = &record.analysis {
        for entry in analysis {
            let answer = match entry {
                AnalysisResponse::TextOnly(text) => {
                    builder.build(text, text, None, cfg.record_id_type())
                }
                AnalysisResponse::Structured(response) => builder.build(
                    &response.varname,
                    &response.value,
                    cfg.numeric_policy().numeric_value(&response.value),
                    cfg.record_id_type(),
                ),
            };
            stats.record(registry.insert(answer));
        }
    }

    if let Some(hcahps) = &record.hcahps {
        for response in hcahps {
            let answer =
                builder.build(&response.varname, &response.value, None, HCAHPS_ANSWER_ID_TYPE);
            stats.record(registry.insert(answer));
        }
    }

    if stats.replaced > 0 {
        tracing::debug!(
            "survey record {}: {} answers replaced earlier answers",
            record.survey_id,
            stats.replaced
        );
    }

    stats
}

struct AnswerBuilder<'a> {
    record: &'a PatientRecord,
    ctx: &'a RecordContext,
    cfg: &'a CoreConfig,
}

impl AnswerBuilder<'_> {
    /// The question reference always uses the record's own service code.
    fn build(
        &self,
        varname: &str,
        response: &str,
        response_numeric: Option<i64>,
        id_type: &str,
    ) -> SurveyAnswer {
        let record = self.record;
        let cfg = self.cfg;

        SurveyAnswer {
            id: answer_id(cfg.client_id(), &record.survey_id, &record.service, varname),
            id_type: id_type.to_string(),
            patient_id: self.ctx.patient_id.clone(),
            patient_id_type: cfg.patient_id_type().to_string(),
            provider_id: None,
            provider_id_type: None,
            location_id: None,
            location_id_type: None,
            encounter_id: self.ctx.encounter_id.clone(),
            encounter_id_type: cfg.encounter_id_type().to_string(),
            account_id: None,
            account_id_type: None,
            survey_id: record.service.clone(),
            survey_id_type: cfg.record_id_type().to_string(),
            survey_question_id: question_id(&record.service, varname),
            survey_question_id_type: cfg.record_id_type().to_string(),
            response_date: record.received_date.clone(),
            encounter_date: self.ctx.admit_date.clone(),
            response: response.to_string(),
            response_numeric,
            client_id: cfg.client_id().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumericPolicy;
    use crate::test_support::test_cfg;

    fn record() -> PatientRecord {
        PatientRecord {
            survey_id: "900001".into(),
            client_id: Some("4242".into()),
            service: "SVC1".into(),
            received_date: "2019-01-15".into(),
            discharge_date: None,
            demographics: Some(vec![
                Response::new("ITMEDREC", "12345"),
                Response::new("ITUNIQUE", "E-77"),
                Response::new("ITADMDAT", "2019-01-01"),
            ]),
            analysis: None,
            hcahps: None,
        }
    }

    fn only_answer<'a>(registry: &'a AnswerRegistry, varname: &str) -> &'a SurveyAnswer {
        registry
            .get(&answer_id("4242", "900001", "SVC1", varname))
            .expect("answer present")
    }

    #[test]
    fn context_comes_from_demographics() {
        let ctx = RecordContext::from_demographics(record().demographics.as_deref());
        assert_eq!(
            ctx,
            RecordContext {
                patient_id: "12345".into(),
                encounter_id: "E-77".into(),
                admit_date: "2019-01-01".into(),
            }
        );
    }

    #[test]
    fn context_defaults_to_empty_strings() {
        assert_eq!(RecordContext::from_demographics(None), RecordContext::default());
        let partial = [Response::new("ITMEDREC", "12345")];
        let ctx = RecordContext::from_demographics(Some(&partial[..]));
        assert_eq!(ctx.patient_id, "12345");
        assert_eq!(ctx.encounter_id, "");
        assert_eq!(ctx.admit_date, "");
    }

    #[test]
    fn repeated_context_variable_uses_last_occurrence() {
        let demographics = [
            Response::new("ITMEDREC", "11111"),
            Response::new("ITUNIQUE", "E-77"),
            Response::new("ITMEDREC", "22222"),
        ];
        let ctx = RecordContext::from_demographics(Some(&demographics[..]));
        assert_eq!(ctx.patient_id, "22222");
        assert_eq!(ctx.encounter_id, "E-77");
    }

    #[test]
    fn demographic_answers_carry_text_only() {
        let cfg = test_cfg();
        let mut registry = AnswerRegistry::new();

        let stats = extract_answers(&mut registry, &record(), &cfg);
        assert_eq!(stats, AnswerStats { inserted: 3, replaced: 0 });

        let answer = only_answer(&registry, "ITMEDREC");
        assert_eq!(answer.response, "12345");
        assert_eq!(answer.response_numeric, None);
        assert_eq!(answer.id_type, "PressGaneyId");
        assert_eq!(answer.patient_id, "12345");
        assert_eq!(answer.patient_id_type, "EhrMrn");
        assert_eq!(answer.encounter_id, "E-77");
        assert_eq!(answer.encounter_id_type, "EhrCsn");
        assert_eq!(answer.encounter_date, "2019-01-01");
        assert_eq!(answer.response_date, "2019-01-15");
        assert_eq!(answer.survey_id, "SVC1");
        assert_eq!(answer.survey_question_id.as_str(), "SVC1|ITMEDREC");
        assert_eq!(answer.client_id, "4242");
        assert!(answer.provider_id.is_none());
        assert!(answer.location_id.is_none());
        assert!(answer.account_id.is_none());
    }

    #[test]
    fn structured_analysis_sets_numeric() {
        let cfg = test_cfg();
        let mut registry = AnswerRegistry::new();
        let mut rec = record();
        rec.analysis = Some(vec![
            AnalysisResponse::Structured(Response::new("Q1", "5")),
            AnalysisResponse::Structured(Response::new("Q2", "0")),
            AnalysisResponse::Structured(Response::new("Q3", "n/a")),
        ]);

        extract_answers(&mut registry, &rec, &cfg);

        let q1 = only_answer(&registry, "Q1");
        assert_eq!(q1.response, "5");
        assert_eq!(q1.response_numeric, Some(5));
        assert_eq!(q1.survey_question_id.as_str(), "SVC1|Q1");

        let q2 = only_answer(&registry, "Q2");
        assert_eq!(q2.response, "0");
        assert_eq!(q2.response_numeric, None);

        let q3 = only_answer(&registry, "Q3");
        assert_eq!(q3.response, "n/a");
        assert_eq!(q3.response_numeric, None);
    }

    #[test]
    fn keep_zero_policy_records_zero() {
        let cfg = test_cfg().with_numeric_policy(NumericPolicy::KeepZero);
        let mut registry = AnswerRegistry::new();
        let mut rec = record();
        rec.analysis = Some(vec![AnalysisResponse::Structured(Response::new("Q2", "0"))]);

        extract_answers(&mut registry, &rec, &cfg);
        assert_eq!(only_answer(&registry, "Q2").response_numeric, Some(0));
    }

    #[test]
    fn text_only_analysis_uses_text_as_variable_and_record_service() {
        let cfg = test_cfg();
        let mut registry = AnswerRegistry::new();
        let mut rec = record();
        rec.service = "SVC9".into();
        rec.analysis = Some(vec![AnalysisResponse::TextOnly(
            "The nurses were great".into(),
        )]);

        extract_answers(&mut registry, &rec, &cfg);

        let answer = registry
            .get(&answer_id("4242", "900001", "SVC9", "The nurses were great"))
            .expect("free text answer present");
        assert_eq!(answer.response, "The nurses were great");
        assert_eq!(answer.response_numeric, None);
        assert_eq!(
            answer.survey_question_id.as_str(),
            "SVC9|The nurses were great"
        );
        assert_eq!(answer.patient_id, "12345");
    }

    #[test]
    fn hcahps_answers_use_fixed_id_type() {
        let cfg = test_cfg();
        let mut registry = AnswerRegistry::new();
        let mut rec = record();
        rec.hcahps = Some(vec![Response::new("CMS_1", "4")]);

        extract_answers(&mut registry, &rec, &cfg);

        let answer = only_answer(&registry, "CMS_1");
        assert_eq!(answer.id_type, HCAHPS_ANSWER_ID_TYPE);
        assert_eq!(answer.survey_id_type, "PressGaneyId");
        assert_eq!(answer.response, "4");
        assert_eq!(answer.response_numeric, None);
    }

    #[test]
    fn later_sections_overwrite_earlier_answers() {
        let cfg = test_cfg();
        let mut registry = AnswerRegistry::new();
        let mut rec = record();
        rec.analysis = Some(vec![AnalysisResponse::Structured(Response::new("Q1", "3"))]);
        rec.hcahps = Some(vec![Response::new("Q1", "4")]);

        let stats = extract_answers(&mut registry, &rec, &cfg);
        assert_eq!(stats.replaced, 1);

        let answer = only_answer(&registry, "Q1");
        assert_eq!(answer.response, "4");
        assert_eq!(answer.id_type, HCAHPS_ANSWER_ID_TYPE);
        assert_eq!(answer.response_numeric, None);
    }

    #[test]
    fn absent_sections_are_skipped() {
        let cfg = test_cfg();
        let mut registry = AnswerRegistry::new();
        let rec = PatientRecord {
            survey_id: "1".into(),
            service: "SVC1".into(),
            ..PatientRecord::default()
        };

        let stats = extract_answers(&mut registry, &rec, &cfg);
        assert_eq!(stats, AnswerStats::default());
        assert!(registry.is_empty());
    }
}

//! Survey inference from the question registry.

use crate::config::CoreConfig;
use crate::model::Survey;
use crate::registry::QuestionRegistry;
use std::collections::HashSet;

/// One [`Survey`] per distinct survey code referenced by a registered question.
///
/// Surveys are emitted in the order their code is first seen in the registry.
pub fn derive_surveys(questions: &QuestionRegistry, cfg: &CoreConfig) -> Vec<Survey> {
    let mut seen = HashSet::new();
    let mut surveys = Vec::new();

    for question in questions.iter() {
        if !seen.insert(question.survey_id.as_str()) {
            continue;
        }
        surveys.push(Survey {
            id: question.survey_id.clone(),
            id_type: cfg.record_id_type().to_string(),
            name: question.survey_id.clone(),
            survey_type: None,
            description: None,
            client_id: cfg.client_id().to_string(),
        });
    }

    surveys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::extract_questions;
    use crate::test_support::test_cfg;
    use press_ganey::QuestionDefinition;

    fn definition(service: &str, varname: &str) -> QuestionDefinition {
        QuestionDefinition {
            service: service.into(),
            varname: varname.into(),
            text: format!("{service} {varname}"),
        }
    }

    #[test]
    fn one_survey_per_distinct_code() {
        let cfg = test_cfg();
        let mut registry = QuestionRegistry::new();
        extract_questions(
            &mut registry,
            &[
                definition("SVC2", "Q1"),
                definition("SVC1", "Q1"),
                definition("SVC2", "Q2"),
                definition("SVC1", "Q3"),
            ],
            &cfg,
        );

        let surveys = derive_surveys(&registry, &cfg);
        let codes: Vec<&str> = surveys.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(codes, vec!["SVC2", "SVC1"]);

        let expected: HashSet<&str> = registry.iter().map(|q| q.survey_id.as_str()).collect();
        let derived: HashSet<&str> = codes.into_iter().collect();
        assert_eq!(derived, expected);
    }

    #[test]
    fn name_defaults_to_code() {
        let cfg = test_cfg();
        let mut registry = QuestionRegistry::new();
        extract_questions(&mut registry, &[definition("SVC1", "Q1")], &cfg);

        let surveys = derive_surveys(&registry, &cfg);
        assert_eq!(surveys.len(), 1);
        assert_eq!(surveys[0].name, "SVC1");
        assert_eq!(surveys[0].id_type, "PressGaneyId");
        assert_eq!(surveys[0].client_id, "4242");
        assert!(surveys[0].survey_type.is_none());
        assert!(surveys[0].description.is_none());
    }

    #[test]
    fn no_questions_means_no_surveys() {
        let cfg = test_cfg();
        assert!(derive_surveys(&QuestionRegistry::new(), &cfg).is_empty());
    }
}

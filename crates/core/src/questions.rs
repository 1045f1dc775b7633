//! Question extraction from a document's question map.

use crate::config::CoreConfig;
use crate::identity::question_id;
use crate::model::SurveyQuestion;
use crate::registry::{Admission, QuestionRegistry};
use press_ganey::QuestionDefinition;

/// Counts from one question extraction pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuestionStats {
    pub inserted: usize,
    pub skipped: usize,
}

/// Build a [`SurveyQuestion`] for each question map entry and offer it to `registry`.
///
/// A question already present in the registry, from this or an earlier document, is left
/// untouched.
pub fn extract_questions(
    registry: &mut QuestionRegistry,
    definitions: &[QuestionDefinition],
    cfg: &CoreConfig,
) -> QuestionStats {
    let mut stats = QuestionStats::default();

    for definition in definitions {
        let question = SurveyQuestion {
            id: question_id(&definition.service, &definition.varname),
            id_type: cfg.record_id_type().to_string(),
            survey_id: definition.service.clone(),
            survey_id_type: cfg.record_id_type().to_string(),
            name: definition.varname.clone(),
            text: definition.text.clone(),
            response_type: None,
            acceptable_response: None,
            client_id: cfg.client_id().to_string(),
        };

        match registry.insert(question) {
            Admission::Inserted => stats.inserted += 1,
            Admission::Skipped => {
                tracing::debug!(
                    "question {}|{} already registered, keeping first definition",
                    definition.service,
                    definition.varname
                );
                stats.skipped += 1;
            }
        }
    }

    stats
}

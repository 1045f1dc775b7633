//! Composite identifiers for questions and answers.
//!
//! These are pure functions: the same source fields always produce the same identifier.
//! Components are never validated beyond existence; callers pass an empty string for a
//! missing field so that the arity stays fixed.

use pgs_types::{CompositeId, ID_DELIMITER};

/// `{survey_code}|{variable_name}`
pub fn question_id(survey_code: &str, variable_name: &str) -> CompositeId {
    compose(&[survey_code, variable_name])
}

/// `{client_id}|{survey_record_id}|{service_code}|{variable_name}`
pub fn answer_id(
    client_id: &str,
    survey_record_id: &str,
    service_code: &str,
    variable_name: &str,
) -> CompositeId {
    compose(&[client_id, survey_record_id, service_code, variable_name])
}

fn compose(parts: &[&str]) -> CompositeId {
    if parts.iter().any(|p| p.contains(ID_DELIMITER)) {
        tracing::warn!(
            "identifier component contains reserved delimiter '{}': {:?}",
            ID_DELIMITER,
            parts
        );
    }
    CompositeId::from_parts(parts)
}

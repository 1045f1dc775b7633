//! In-memory registries of questions and answers.
//!
//! Both registries iterate in insertion order and never remove entries. They differ only in
//! how a colliding identifier is handled:
//! - [`QuestionRegistry`]: first write wins, later definitions are skipped.
//! - [`AnswerRegistry`]: last write wins, the later answer replaces the earlier one in place
//!   (keeping the original position).

use crate::model::{SurveyAnswer, SurveyQuestion};
use pgs_types::CompositeId;
use std::collections::HashMap;

/// Outcome of offering a question to the [`QuestionRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Inserted,
    Skipped,
}

/// Outcome of offering an answer to the [`AnswerRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Inserted,
    Replaced,
}

#[derive(Clone, Debug)]
struct Entries<T> {
    items: Vec<T>,
    index: HashMap<CompositeId, usize>,
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Entries<T> {
    fn get(&self, id: &CompositeId) -> Option<&T> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    fn slot(&self, id: &CompositeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn push(&mut self, id: CompositeId, item: T) {
        self.index.insert(id, self.items.len());
        self.items.push(item);
    }
}

/// Questions keyed by `{survey_code}|{variable_name}`.
#[derive(Clone, Debug, Default)]
pub struct QuestionRegistry {
    entries: Entries<SurveyQuestion>,
}

impl QuestionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `question` unless its identifier is already present.
    pub fn insert(&mut self, question: SurveyQuestion) -> Admission {
        if self.entries.slot(&question.id).is_some() {
            return Admission::Skipped;
        }
        self.entries.push(question.id.clone(), question);
        Admission::Inserted
    }

    pub fn get(&self, id: &CompositeId) -> Option<&SurveyQuestion> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &CompositeId) -> bool {
        self.entries.slot(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.items.is_empty()
    }

    /// Questions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SurveyQuestion> {
        self.entries.items.iter()
    }
}

/// Answers keyed by `{client_id}|{survey_record_id}|{service_code}|{variable_name}`.
#[derive(Clone, Debug, Default)]
pub struct AnswerRegistry {
    entries: Entries<SurveyAnswer>,
}

impl AnswerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `answer`, replacing any earlier answer with the same identifier.
    pub fn insert(&mut self, answer: SurveyAnswer) -> Placement {
        match self.entries.slot(&answer.id) {
            Some(i) => {
                self.entries.items[i] = answer;
                Placement::Replaced
            }
            None => {
                self.entries.push(answer.id.clone(), answer);
                Placement::Inserted
            }
        }
    }

    pub fn get(&self, id: &CompositeId) -> Option<&SurveyAnswer> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.items.is_empty()
    }

    /// Answers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SurveyAnswer> {
        self.entries.items.iter()
    }
}

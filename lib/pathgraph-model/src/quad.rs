use crate::{Direction, Value};

/// An ordered 4-tuple (Subject, Predicate, Object, Label) of [`Value`]s.
///
/// `label` may be absent; subject, predicate and object are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quad {
    pub subject: Value,
    pub predicate: Value,
    pub object: Value,
    pub label: Option<Value>,
}

impl Quad {
    pub fn new(subject: Value, predicate: Value, object: Value, label: Option<Value>) -> Self {
        Self {
            subject,
            predicate,
            object,
            label,
        }
    }

    pub fn triple(subject: Value, predicate: Value, object: Value) -> Self {
        Self::new(subject, predicate, object, None)
    }

    /// Projects the quad onto one of its four directions.
    pub fn get(&self, direction: Direction) -> Option<&Value> {
        match direction {
            Direction::Subject => Some(&self.subject),
            Direction::Predicate => Some(&self.predicate),
            Direction::Object => Some(&self.object),
            Direction::Label => self.label.as_ref(),
        }
    }
}

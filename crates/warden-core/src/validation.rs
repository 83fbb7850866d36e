//! Caller-supplied validation policies
//!
//! The archive core places no constraints on field shapes; domain rules
//! are injected per mutation as a [`ValidationPolicy`]. Any
//! `Fn(&FieldMap) -> Result<(), ValidationFailure>` closure is a policy.

use crate::errors::ValidationFailure;
use crate::fields::FieldMap;

/// Decides whether a proposed field set is acceptable
pub trait ValidationPolicy: Send + Sync {
    /// Check the proposed fields, returning all rejection messages at once
    fn validate(&self, fields: &FieldMap) -> Result<(), ValidationFailure>;
}

impl<F> ValidationPolicy for F
where
    F: Fn(&FieldMap) -> Result<(), ValidationFailure> + Send + Sync,
{
    fn validate(&self, fields: &FieldMap) -> Result<(), ValidationFailure> {
        self(fields)
    }
}

/// A policy that accepts every field set
pub fn accept_all() -> impl ValidationPolicy {
    |_fields: &FieldMap| -> Result<(), ValidationFailure> { Ok(()) }
}

/// A policy that requires the named fields to be present and non-empty
///
/// Collects every missing or empty field into one failure rather than
/// stopping at the first, so callers can report all problems together.
pub fn require_fields(names: impl IntoIterator<Item = &'static str>) -> impl ValidationPolicy {
    let required: Vec<&'static str> = names.into_iter().collect();
    move |fields: &FieldMap| {
        let mut messages = Vec::new();
        for name in &required {
            match fields.get(*name) {
                None => messages.push(format!("field '{name}' is required")),
                Some(value) if value.is_empty() => {
                    messages.push(format!("field '{name}' must not be empty"));
                }
                Some(_) => {}
            }
        }
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { messages })
        }
    }
}

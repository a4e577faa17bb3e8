//! Field-level validation results.
//!
//! Form checks never stop at the first problem: each failing field gets an
//! entry so the whole form can be corrected in one pass. Field names use
//! the same camelCase keys as the serialized forms.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::CommerceError;

/// One failing field and its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered collection of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record `message` if `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Append all of `other`'s errors after this one's.
    pub fn merge(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    /// `Ok` when nothing failed, otherwise [`CommerceError::Validation`].
    pub fn into_result(self) -> Result<(), CommerceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// Loose email shape check: somewhere in `s` there is
/// `<non-space>+@<non-space>+.<non-space>+`.
pub fn is_valid_email(s: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"\S+@\S+\.\S+").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

//! Field-level validation errors
//!
//! Validators run every field check before any persistence call and
//! report all failures together instead of stopping at the first one.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// One failed check on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl FieldError {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collector for [`FieldError`]s.
///
/// ## Examples
/// ```rust
/// use kernel::validation::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// let age: Option<u8> = errors.check("age", "x".parse::<u8>());
/// assert!(age.is_none());
/// assert_eq!(errors.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) {
        self.0.push(FieldError::new(field, message));
    }

    /// Record the error of `result` under `field` and return the value on success.
    pub fn check<T, E: fmt::Display>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(field, e.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_failure() {
        let mut errors = FieldErrors::new();
        errors.check::<u8, _>("age", "-1".parse::<u8>());
        errors.push("name", "Name is required");
        let value = errors.check("count", "7".parse::<u32>());

        assert_eq!(value, Some(7));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_field("age"));
        assert!(errors.contains_field("name"));
        assert!(!errors.contains_field("count"));
    }

    #[test]
    fn test_finish() {
        assert!(FieldErrors::new().finish().is_ok());

        let mut errors = FieldErrors::new();
        errors.push("email", "Your email is invalid");
        let err = errors.finish().unwrap_err();
        assert_eq!(err.to_string(), "email: Your email is invalid");
    }
}

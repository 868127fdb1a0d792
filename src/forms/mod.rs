//! Form validation for custom agents and profile settings
//!
//! Validation collects every failing field instead of stopping at the first,
//! so the user can fix the whole form in one go.

pub mod custom_agent;
pub mod profile;

use thiserror::Error;

/// One field's complaint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct FormError(pub Vec<FieldError>);

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

impl FormError {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    #[cfg(test)]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

/// Accumulates field errors while a form is checked
#[derive(Debug, Default)]
pub(crate) struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub(crate) fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.errors.push(FieldError {
                field,
                message: message.to_string(),
            });
        }
    }

    pub(crate) fn finish(self) -> Result<(), FormError> {
        if self.errors.is_empty() { Ok(()) } else { Err(FormError(self.errors)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_collects_all_errors() {
        let mut checker = Checker::default();
        checker.check(false, "name", "too short");
        checker.check(true, "email", "unused");
        checker.check(false, "purpose", "too short");

        let err = checker.finish().unwrap_err();
        assert_eq!(err.fields().len(), 2);
        assert!(err.has("name"));
        assert!(!err.has("email"));
        assert_eq!(err.to_string(), "name: too short\npurpose: too short");
    }
}

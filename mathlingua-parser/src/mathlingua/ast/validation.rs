//! The all-or-nothing result shape used across the front end

use super::diagnostics::Diagnostic;

/// Either a fully validated value or the diagnostics explaining why there is none.
///
/// The two cases are mutually exclusive: a `Failure` never carries a partial value, which is
/// what keeps structurally invalid files out of every downstream index.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation<T> {
    Success(T),
    Failure(Vec<Diagnostic>),
}

impl<T> Validation<T> {
    /// Build a validation from a value and the diagnostics gathered while producing it.
    pub fn from_parts(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            Validation::Success(value)
        } else {
            Validation::Failure(diagnostics)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Validation::Success(value) => Some(value),
            Validation::Failure(_) => None,
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            Validation::Success(_) => &[],
            Validation::Failure(errors) => errors,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validation<U> {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }

    pub fn into_result(self) -> Result<T, Vec<Diagnostic>> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(errors) => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathlingua::ast::Location;

    #[test]
    fn test_from_parts_without_diagnostics_succeeds() {
        let validation = Validation::from_parts(3, vec![]);
        assert_eq!(validation.value(), Some(&3));
        assert!(validation.errors().is_empty());
    }

    #[test]
    fn test_from_parts_with_diagnostics_drops_value() {
        let error = Diagnostic::structural("Expected a ':'", Location::new(0, 7));
        let validation = Validation::from_parts(3, vec![error.clone()]);
        assert!(!validation.is_success());
        assert_eq!(validation.value(), None);
        assert_eq!(validation.into_result(), Err(vec![error]));
    }
}

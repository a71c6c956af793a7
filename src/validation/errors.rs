/// A single field-level validation failure.
///
/// `alternatives` is only populated by a failed disjunction: it holds the
/// errors of every branch, in branch order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation error on param '{param}': {message}")]
pub struct FieldError {
    param: String,
    message: String,
    alternatives: Vec<Vec<FieldError>>,
}

impl FieldError {
    pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            message: message.into(),
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<Vec<FieldError>>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn alternatives(&self) -> &[Vec<FieldError>] {
        &self.alternatives
    }

    pub fn into_alternatives(self) -> Vec<Vec<FieldError>> {
        self.alternatives
    }
}

/// Append-only, ordered sink of [`FieldError`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.entries.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.entries.iter()
    }

    /// Rendered messages, in the order they were recorded.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.entries
    }
}

impl Extend<FieldError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let error = FieldError::new("age", "must be >= 18");
        assert_eq!(error.to_string(), "Validation error on param 'age': must be >= 18");
        assert_eq!(error.param(), "age");
        assert_eq!(error.message(), "must be >= 18");
        assert!(error.alternatives().is_empty());
    }

    #[test]
    fn test_errors_keep_order() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::new("a", "first"));
        errors.extend([FieldError::new("b", "second")]);

        assert_eq!(errors.len(), 2);
        let params: Vec<&str> = errors.iter().map(FieldError::param).collect();
        assert_eq!(params, ["a", "b"]);
    }
}

//! Primitive validators: equality, membership, integer text and strings.

use regex::Regex;
use serde_json::Value;

use crate::error::{ParamGuardError, Result};
use crate::validation::abort::Abort;
use crate::validation::combinators::Or;
use crate::validation::context::FieldContext;
use crate::validation::errors::ValidationErrors;
use crate::validation::validator::Validator;

const NOT_A_STRING: &str = "must be a unicode string";

/// Passes only when the value equals `expected`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equals {
    expected: Value,
}

impl Equals {
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }

    pub(crate) fn run(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> Value {
        if value != self.expected {
            ctx.add_error(errors, format!("must equal {}", self.expected));
        }
        value
    }
}

/// Membership in a fixed set of candidate values.
///
/// Backed by a disjunction of [`Equals`] checks, so a miss reports the
/// disjunction's combined message.
#[derive(Debug, Clone)]
pub struct OneOf {
    choices: Or,
}

impl OneOf {
    pub fn new<I, V>(candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let branches: Vec<Validator> = candidates.into_iter().map(Validator::equals).collect();
        if branches.len() < 2 {
            return Err(ParamGuardError::configuration(format!(
                "OneOf requires at least two candidate values, got {}",
                branches.len()
            )));
        }
        Ok(Self {
            choices: Or::new(branches)?,
        })
    }

    pub(crate) fn run(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> std::result::Result<Value, Abort> {
        self.choices.run(value, ctx, errors)
    }
}

/// Text holding a base-10 integer, e.g. `" +0016 "`; yields the number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextNumber {
    min_value: Option<i64>,
    max_value: Option<i64>,
}

impl TextNumber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_value(mut self, min: i64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: i64) -> Self {
        self.max_value = Some(max);
        self
    }

    pub(crate) fn run(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> Value {
        let text = match &value {
            Value::String(text) => text.trim(),
            _ => {
                ctx.add_error(errors, NOT_A_STRING);
                return value;
            }
        };

        let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            ctx.add_error(errors, "must only contain digits");
            return value;
        }

        let number = match text.parse::<i64>() {
            Ok(number) => number,
            Err(_) => {
                // Well-formed but wider than i64: the sign says which bound it breaks.
                let message = match (text.starts_with('-'), self.min_value, self.max_value) {
                    (true, Some(min), _) => format!("must be >= {}", min),
                    (true, None, _) => format!("must be >= {}", i64::MIN),
                    (false, _, Some(max)) => format!("must be <= {}", max),
                    (false, _, None) => format!("must be <= {}", i64::MAX),
                };
                ctx.add_error(errors, message);
                return value;
            }
        };

        // At most one range error; the lower bound is checked first.
        match (self.min_value, self.max_value) {
            (Some(min), _) if number < min => {
                ctx.add_error(errors, format!("must be >= {}", min))
            }
            (_, Some(max)) if number > max => {
                ctx.add_error(errors, format!("must be <= {}", max))
            }
            _ => {}
        }
        Value::from(number)
    }
}

/// String checks shared by the whitespace-preserving, trimmed and regex
/// flavours.
///
/// Transformations (trim, then lowercase) run before any check. The length
/// check and the content check are independent, so one value can collect
/// two errors.
#[derive(Debug, Clone, Default)]
pub struct Text {
    trim: bool,
    lowercase: bool,
    min_length: usize,
    max_length: Option<usize>,
    invalid: Option<Regex>,
    require_pattern: bool,
}

impl Text {
    /// Keeps surrounding whitespace.
    pub fn whitespace() -> Self {
        Self::default()
    }

    /// Strips both ends before validating.
    pub fn string() -> Self {
        Self {
            trim: true,
            ..Self::default()
        }
    }

    /// Like [`Text::whitespace`], and the value itself must compile as a
    /// regular expression.
    pub fn regex() -> Self {
        Self {
            require_pattern: true,
            ..Self::default()
        }
    }

    pub fn trim_whitespace(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Minimum length in characters; zero disables the check.
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = min;
        self
    }

    /// Maximum length in characters; zero disables the check.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max).filter(|max| *max > 0);
        self
    }

    /// Reject values where `pattern` matches anywhere.
    pub fn invalid_re(self, pattern: &str) -> Result<Self> {
        Ok(self.invalid_pattern(Regex::new(pattern)?))
    }

    /// Same as [`Text::invalid_re`] with an already compiled pattern.
    pub fn invalid_pattern(mut self, pattern: Regex) -> Self {
        self.invalid = Some(pattern);
        self
    }

    pub(crate) fn run(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> Value {
        let mut text = match value {
            Value::String(text) => text,
            other => {
                ctx.add_error(errors, NOT_A_STRING);
                return other;
            }
        };

        if self.trim {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                text = trimmed.to_string();
            }
        }
        if self.lowercase {
            text = text.to_lowercase();
        }

        let length = text.chars().count();
        match (self.min_length, self.max_length) {
            (min, _) if min > 0 && length < min => {
                ctx.add_error(errors, format!("must be >= {} characters", min))
            }
            (_, Some(max)) if length > max => {
                ctx.add_error(errors, format!("must be <= {} characters", max))
            }
            _ => {}
        }

        if self.invalid.as_ref().is_some_and(|pattern| pattern.is_match(&text)) {
            ctx.add_error(errors, "contains invalid content");
        }

        if self.require_pattern && Regex::new(&text).is_err() {
            ctx.add_error(errors, "not a valid regular expression");
        }

        Value::String(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validator::Checked;
    use serde_json::json;

    fn check(validator: impl Into<Validator>, value: Value) -> Checked {
        let validator: Validator = validator.into();
        validator.check("field", value).unwrap()
    }

    #[test]
    fn test_equals() {
        let checked = check(Equals::new("yes"), json!("yes"));
        assert!(checked.is_valid());
        assert_eq!(checked.value, json!("yes"));

        let checked = check(Equals::new("yes"), json!("no"));
        assert_eq!(checked.value, json!("no"));
        assert_eq!(
            checked.errors.messages(),
            vec![r#"Validation error on param 'field': must equal "yes""#.to_string()]
        );
    }

    #[test]
    fn test_one_of() {
        let one_of = || OneOf::new([json!(1), json!("true"), json!("TRUE")]).unwrap();

        let checked = check(one_of(), json!(1));
        assert!(checked.is_valid());
        assert_eq!(checked.value, json!(1));

        let checked = check(one_of(), json!("TRUE"));
        assert!(checked.is_valid());
        assert_eq!(checked.value, json!("TRUE"));

        let checked = check(one_of(), json!(0));
        assert_eq!(checked.value, json!(0));
        assert_eq!(checked.errors.len(), 1);
    }

    #[test]
    fn test_one_of_requires_two_values() {
        assert!(matches!(
            OneOf::new(["only"]),
            Err(ParamGuardError::Configuration(_))
        ));
        assert!(OneOf::new(Vec::<Value>::new()).is_err());
    }

    #[test]
    fn test_text_number_parses_padded_signed_text() {
        let checked = check(TextNumber::new().min_value(16).max_value(16), json!(" +0016 "));
        assert!(checked.is_valid());
        assert_eq!(checked.value, json!(16));
    }

    #[test]
    fn test_text_number_rejects_non_digits() {
        for input in ["1a", "a1", "", "1.1", "a", "+", " - 1"] {
            let checked = check(TextNumber::new(), json!(input));
            assert_eq!(
                checked.errors.messages(),
                vec!["Validation error on param 'field': must only contain digits".to_string()],
                "input {:?}",
                input
            );
            assert_eq!(checked.value, json!(input));
        }
    }

    #[test]
    fn test_text_number_requires_string() {
        let checked = check(TextNumber::new(), json!(12));
        assert_eq!(
            checked.errors.messages(),
            vec!["Validation error on param 'field': must be a unicode string".to_string()]
        );
    }

    #[test]
    fn test_text_number_bounds() {
        let checked = check(TextNumber::new().max_value(0), json!("1"));
        assert_eq!(
            checked.errors.messages(),
            vec!["Validation error on param 'field': must be <= 0".to_string()]
        );

        let checked = check(TextNumber::new().min_value(0), json!("-1"));
        assert_eq!(
            checked.errors.messages(),
            vec!["Validation error on param 'field': must be >= 0".to_string()]
        );
        assert_eq!(checked.value, json!(-1));
    }

    #[test]
    fn test_text_number_wider_than_i64_is_out_of_range() {
        let huge = "100000000000000000000";

        let checked = check(TextNumber::new().max_value(10), json!(huge));
        assert_eq!(
            checked.errors.messages(),
            vec!["Validation error on param 'field': must be <= 10".to_string()]
        );
        assert_eq!(checked.value, json!(huge));

        let checked = check(TextNumber::new().min_value(-10), json!(format!(" -{} ", huge)));
        assert_eq!(
            checked.errors.messages(),
            vec!["Validation error on param 'field': must be >= -10".to_string()]
        );

        let checked = check(TextNumber::new(), json!(huge));
        assert_eq!(
            checked.errors.messages(),
            vec![format!("Validation error on param 'field': must be <= {}", i64::MAX)]
        );

        let checked = check(TextNumber::new().max_value(10), json!(format!("-{}", huge)));
        assert_eq!(
            checked.errors.messages(),
            vec![format!("Validation error on param 'field': must be >= {}", i64::MIN)]
        );
    }

    #[test]
    fn test_text_number_min_checked_before_max() {
        // Inverted bounds: both are violated, only the lower one is reported.
        let checked = check(TextNumber::new().min_value(10).max_value(0), json!("5"));
        assert_eq!(checked.errors.len(), 1);
        assert!(checked.errors.messages()[0].ends_with("must be >= 10"));
    }

    #[test]
    fn test_whitespace_type_checks() {
        for value in [json!(true), json!(1), Value::Null] {
            let checked = check(Text::whitespace(), value.clone());
            assert_eq!(checked.errors.len(), 1);
            assert_eq!(checked.value, value);
        }
    }

    #[test]
    fn test_whitespace_invalid_re() {
        let checked = check(Text::whitespace().invalid_re("foo").unwrap(), json!("  foo "));
        assert_eq!(checked.errors.len(), 1);

        let compiled = Regex::new("foo").unwrap();
        let checked = check(Text::whitespace().invalid_pattern(compiled), json!("  foo "));
        assert_eq!(checked.errors.len(), 1);
    }

    #[test]
    fn test_whitespace_lengths_count_padding() {
        let checked = check(Text::whitespace().max_length(5), json!("  a   "));
        assert_eq!(checked.errors.len(), 1);

        let checked = check(Text::whitespace().min_length(5), json!(" a  "));
        assert_eq!(checked.errors.len(), 1);
    }

    #[test]
    fn test_whitespace_reports_length_and_content() {
        let validator = Text::whitespace().invalid_re("foo").unwrap().min_length(10);
        let checked = check(validator, json!(" foo "));
        assert_eq!(
            checked.errors.messages(),
            vec![
                "Validation error on param 'field': must be >= 10 characters".to_string(),
                "Validation error on param 'field': contains invalid content".to_string(),
            ]
        );
    }

    #[test]
    fn test_whitespace_pass_keeps_value() {
        let validator = Text::whitespace()
            .invalid_re("foo")
            .unwrap()
            .min_length(5)
            .max_length(5);
        let checked = check(validator, json!(" bar "));
        assert!(checked.is_valid());
        assert_eq!(checked.value, json!(" bar "));
    }

    #[test]
    fn test_string_trims_then_lowercases() {
        let validator = Text::string()
            .invalid_re("foo")
            .unwrap()
            .min_length(3)
            .max_length(3)
            .lowercase();
        let checked = check(validator, json!(" bAr "));
        assert!(checked.is_valid());
        assert_eq!(checked.value, json!("bar"));
    }

    #[test]
    fn test_string_invalid_whitespace_inside() {
        let validator = Text::string().invalid_re(" ").unwrap();
        let checked = check(validator, json!(" hello world "));
        assert_eq!(checked.errors.len(), 1);
        assert_eq!(checked.value, json!("hello world"));
    }

    #[test]
    fn test_zero_lengths_disable_checks() {
        let checked = check(Text::string().min_length(0).max_length(0), json!(""));
        assert!(checked.is_valid());
    }

    #[test]
    fn test_invalid_re_is_configuration_error() {
        assert!(matches!(
            Text::whitespace().invalid_re("(unclosed"),
            Err(ParamGuardError::Configuration(_))
        ));
    }

    #[test]
    fn test_regex_text() {
        let checked = check(Text::regex(), json!("[a"));
        assert_eq!(
            checked.errors.messages(),
            vec!["Validation error on param 'field': not a valid regular expression".to_string()]
        );

        let checked = check(Text::regex(), json!("^[a-z]+$"));
        assert!(checked.is_valid());
    }

    #[test]
    fn test_regex_text_runs_both_checks() {
        let checked = check(Text::regex().min_length(5), json!("[a"));
        assert_eq!(checked.errors.len(), 2);
    }
}

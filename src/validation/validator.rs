use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::validation::abort::Abort;
use crate::validation::combinators::{And, List, Or};
use crate::validation::context::FieldContext;
use crate::validation::errors::ValidationErrors;
use crate::validation::validators::{Equals, OneOf, Text, TextNumber};

/// Application-defined validation step.
///
/// Implement this for checks the built-in variants cannot express, such as
/// resolving an id against a store, and wrap it with [`Validator::custom`].
///
/// # Example
///
/// ```rust,ignore
/// struct Even;
///
/// impl Check for Even {
///     fn check(
///         &self,
///         value: Value,
///         ctx: &FieldContext<'_>,
///         errors: &mut ValidationErrors,
///     ) -> Result<Value, Abort> {
///         if value.as_i64().is_some_and(|n| n % 2 != 0) {
///             ctx.add_error(errors, "must be even");
///         }
///         Ok(value)
///     }
/// }
/// ```
pub trait Check: Send + Sync + 'static {
    fn check(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> std::result::Result<Value, Abort>;

    /// Name used in `Debug` output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A declaratively configured check and coercion step for one value.
///
/// Validators are built once, typically while routes are registered, and
/// shared by every request afterwards.
#[derive(Clone, Default)]
pub enum Validator {
    /// Accepts every value unchanged.
    #[default]
    Any,
    Equals(Equals),
    OneOf(OneOf),
    TextNumber(TextNumber),
    Text(Text),
    And(And),
    Or(Or),
    List(List),
    Custom(Arc<dyn Check>),
}

/// Value and errors produced by [`Validator::check`].
#[derive(Debug, Clone, PartialEq)]
pub struct Checked {
    pub value: Value,
    pub errors: ValidationErrors,
}

impl Checked {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Validator {
    pub fn any() -> Self {
        Self::Any
    }

    pub fn equals(expected: impl Into<Value>) -> Self {
        Self::Equals(Equals::new(expected))
    }

    /// Membership in a fixed set of at least two values.
    pub fn one_of<I, V>(candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        OneOf::new(candidates).map(Self::OneOf)
    }

    /// Conjunction: children run in order until the first failure.
    pub fn and(children: impl IntoIterator<Item = Validator>) -> Self {
        Self::And(And::new(children))
    }

    /// Disjunction: the first child that passes wins.
    pub fn or(branches: impl IntoIterator<Item = Validator>) -> Result<Self> {
        Or::new(branches).map(Self::Or)
    }

    /// Element-wise validation of a JSON array.
    pub fn list(element: impl Into<Validator>) -> List {
        List::new(element)
    }

    pub fn custom(check: impl Check) -> Self {
        Self::Custom(Arc::new(check))
    }

    /// Validate `value` at the position described by `ctx`.
    ///
    /// Failures are appended to `errors`; the returned value is a best
    /// effort and only trustworthy when no errors were added. `Err` means
    /// the whole pass was aborted.
    pub fn validate(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> std::result::Result<Value, Abort> {
        match self {
            Self::Any => Ok(value),
            Self::Equals(equals) => Ok(equals.run(value, ctx, errors)),
            Self::OneOf(one_of) => one_of.run(value, ctx, errors),
            Self::TextNumber(number) => Ok(number.run(value, ctx, errors)),
            Self::Text(text) => Ok(text.run(value, ctx, errors)),
            Self::And(and) => and.run(value, ctx, errors),
            Self::Or(or) => or.run(value, ctx, errors),
            Self::List(list) => list.run(value, ctx, errors),
            Self::Custom(check) => check.check(value, ctx, errors),
        }
    }

    /// Validate a standalone value under the parameter name `param`.
    pub fn check(&self, param: &str, value: Value) -> std::result::Result<Checked, Abort> {
        let ctx = FieldContext::new(param);
        let mut errors = ValidationErrors::new();
        let value = self.validate(value, &ctx, &mut errors)?;
        Ok(Checked { value, errors })
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Equals(equals) => f.debug_tuple("Equals").field(equals).finish(),
            Self::OneOf(one_of) => f.debug_tuple("OneOf").field(one_of).finish(),
            Self::TextNumber(number) => f.debug_tuple("TextNumber").field(number).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::And(and) => f.debug_tuple("And").field(and).finish(),
            Self::Or(or) => f.debug_tuple("Or").field(or).finish(),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Custom(check) => f.debug_tuple("Custom").field(&check.name()).finish(),
        }
    }
}

impl From<Equals> for Validator {
    fn from(equals: Equals) -> Self {
        Self::Equals(equals)
    }
}

impl From<OneOf> for Validator {
    fn from(one_of: OneOf) -> Self {
        Self::OneOf(one_of)
    }
}

impl From<TextNumber> for Validator {
    fn from(number: TextNumber) -> Self {
        Self::TextNumber(number)
    }
}

impl From<Text> for Validator {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<And> for Validator {
    fn from(and: And) -> Self {
        Self::And(and)
    }
}

impl From<Or> for Validator {
    fn from(or: Or) -> Self {
        Self::Or(or)
    }
}

impl From<List> for Validator {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

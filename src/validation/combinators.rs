//! Validators built from other validators.

use serde_json::Value;

use crate::error::{ParamGuardError, Result};
use crate::validation::abort::Abort;
use crate::validation::context::FieldContext;
use crate::validation::errors::{FieldError, ValidationErrors};
use crate::validation::validator::Validator;

/// Conjunction: runs children in order, threading the transformed value,
/// and stops at the first child that reports an error.
///
/// The failing child's errors are re-recorded under this validator's path,
/// so their text ends up nested inside the outer message.
#[derive(Debug, Clone, Default)]
pub struct And {
    children: Vec<Validator>,
}

impl And {
    pub fn new(children: impl IntoIterator<Item = Validator>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    pub fn children(&self) -> &[Validator] {
        &self.children
    }

    pub(crate) fn run(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> std::result::Result<Value, Abort> {
        let mut current = value;
        for child in &self.children {
            let mut child_errors = ValidationErrors::new();
            current = child.validate(current, ctx, &mut child_errors)?;
            if !child_errors.is_empty() {
                for error in child_errors {
                    let message = error.to_string();
                    errors.push(ctx.error(message).with_alternatives(error.into_alternatives()));
                }
                break;
            }
        }
        Ok(current)
    }
}

/// Disjunction: every branch sees the original value; the first branch
/// that passes supplies the result.
///
/// When all branches fail a single combined error is recorded. Its message
/// has the form `disjunction of evaluators failed: !((a) || (b))` and the
/// per-branch errors stay available through
/// [`FieldError::alternatives`].
#[derive(Debug, Clone)]
pub struct Or {
    branches: Vec<Validator>,
}

impl Or {
    pub fn new(branches: impl IntoIterator<Item = Validator>) -> Result<Self> {
        let branches: Vec<Validator> = branches.into_iter().collect();
        if branches.is_empty() {
            return Err(ParamGuardError::configuration(
                "Or requires at least one validator",
            ));
        }
        Ok(Self { branches })
    }

    pub fn branches(&self) -> &[Validator] {
        &self.branches
    }

    pub(crate) fn run(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> std::result::Result<Value, Abort> {
        let mut failures: Vec<Vec<FieldError>> = Vec::with_capacity(self.branches.len());
        for branch in &self.branches {
            let mut branch_errors = ValidationErrors::new();
            let result = branch.validate(value.clone(), ctx, &mut branch_errors)?;
            if branch_errors.is_empty() {
                return Ok(result);
            }
            failures.push(branch_errors.into_vec());
        }

        let groups: Vec<String> = failures
            .iter()
            .map(|failure| {
                let messages: Vec<String> = failure.iter().map(ToString::to_string).collect();
                format!("({})", messages.join(", "))
            })
            .collect();
        let message = format!("disjunction of evaluators failed: !({})", groups.join(" || "));
        errors.push(ctx.error(message).with_alternatives(failures));
        Ok(value)
    }
}

/// Validates every element of a JSON array against one element validator.
///
/// A length violation is reported once and does not stop the element
/// checks. Elements are replaced by their validated form and attributed to
/// `name[index]`.
#[derive(Debug, Clone)]
pub struct List {
    element: Box<Validator>,
    min_elements: Option<usize>,
    max_elements: Option<usize>,
}

impl List {
    pub fn new(element: impl Into<Validator>) -> Self {
        Self {
            element: Box::new(element.into()),
            min_elements: None,
            max_elements: None,
        }
    }

    pub fn min_elements(mut self, min: usize) -> Self {
        self.min_elements = Some(min);
        self
    }

    pub fn max_elements(mut self, max: usize) -> Self {
        self.max_elements = Some(max);
        self
    }

    pub(crate) fn run(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> std::result::Result<Value, Abort> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                ctx.add_error(errors, "must be a list");
                return Ok(other);
            }
        };

        let count = items.len();
        match (self.min_elements, self.max_elements) {
            (Some(min), _) if count < min => {
                ctx.add_error(errors, format!("must contain >= {} elements", min))
            }
            (_, Some(max)) if count > max => {
                ctx.add_error(errors, format!("must contain <= {} elements", max))
            }
            _ => {}
        }

        let mut validated = Vec::with_capacity(count);
        for (index, item) in items.into_iter().enumerate() {
            validated.push(self.element.validate(item, &ctx.element(index), errors)?);
        }
        Ok(Value::Array(validated))
    }
}

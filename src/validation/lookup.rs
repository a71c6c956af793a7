use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::http::Source;
use crate::validation::abort::Abort;
use crate::validation::context::FieldContext;
use crate::validation::errors::ValidationErrors;
use crate::validation::validator::{Check, Validator};

type Resolver = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Turns an id into the entity it names.
///
/// The id is validated first and only a clean id is handed to the resolver.
/// When nothing is found the outcome depends on where the id came from: a
/// path variable aborts with 404, any other source records
/// `Invalid <entity>`.
#[derive(Clone)]
pub struct Lookup {
    entity: String,
    id: Validator,
    resolver: Resolver,
}

impl Lookup {
    pub fn new<F>(entity: impl Into<String>, id: impl Into<Validator>, resolver: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            entity: entity.into(),
            id: id.into(),
            resolver: Arc::new(resolver),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }
}

impl Check for Lookup {
    fn check(
        &self,
        value: Value,
        ctx: &FieldContext<'_>,
        errors: &mut ValidationErrors,
    ) -> Result<Value, Abort> {
        let mut id_errors = ValidationErrors::new();
        let id = self.id.validate(value, ctx, &mut id_errors)?;

        let found = if id_errors.is_empty() {
            (self.resolver)(&id)
        } else {
            None
        };
        errors.extend(id_errors);

        match found {
            Some(entity) => Ok(entity),
            None if ctx.source() == Source::Path => {
                Err(Abort::not_found(format!("{} not found", self.entity)))
            }
            None => {
                ctx.add_error(errors, format!("Invalid {}", self.entity));
                Ok(Value::Null)
            }
        }
    }

    fn name(&self) -> &str {
        "Lookup"
    }
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("entity", &self.entity)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Resolve an id to an application entity, see [`Lookup`].
    pub fn lookup<F>(entity: impl Into<String>, id: impl Into<Validator>, resolver: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self::custom(Lookup::new(entity, id, resolver))
    }
}

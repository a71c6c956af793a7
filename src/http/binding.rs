//! Binding request parameters to handler arguments.
//!
//! A [`Binding`] maps destination names to [`Param`]s. For every request it
//! reads each parameter from its source, validates it and either hands the
//! coerced values to the handler or answers with one 400 listing every
//! problem.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{Json, Router, routing::put};
//! use paramguard::http::{Binding, BoundParams, Param, RequestContext};
//! use paramguard::validation::Text;
//! use serde_json::{Value, json};
//!
//! async fn create(
//!     _ctx: RequestContext<()>,
//!     params: BoundParams,
//! ) -> paramguard::Result<Json<Value>> {
//!     let name: String = params.get("name")?;
//!     Ok(Json(json!({ "created": name })))
//! }
//!
//! # fn main() -> paramguard::Result<()> {
//! let binding = Binding::builder()
//!     .bind("name", Param::new("name", Text::string().min_length(1).max_length(10)))
//!     .build()?;
//!
//! let app: Router = Router::new().route("/item", put(binding.handler(create)));
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::Request,
    handler::Handler,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ValidationConfig;
use crate::error::{ParamGuardError, Result};
use crate::http::source::{RequestParams, Source};
use crate::validation::{Abort, FieldContext, ValidationErrors, Validator};

/// One bound parameter: where to read it and how to check it.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    validator: Validator,
    source: Source,
    optional: bool,
    default: Option<Value>,
}

impl Param {
    /// Parameter `name` read from the JSON body.
    pub fn new(name: impl Into<String>, validator: impl Into<Validator>) -> Self {
        Self {
            name: name.into(),
            validator: validator.into(),
            source: Source::default(),
            optional: false,
            default: None,
        }
    }

    pub fn json(name: impl Into<String>, validator: impl Into<Validator>) -> Self {
        Self::new(name, validator).source(Source::Json)
    }

    pub fn query(name: impl Into<String>, validator: impl Into<Validator>) -> Self {
        Self::new(name, validator).source(Source::Query)
    }

    pub fn form(name: impl Into<String>, validator: impl Into<Validator>) -> Self {
        Self::new(name, validator).source(Source::Form)
    }

    pub fn path(name: impl Into<String>, validator: impl Into<Validator>) -> Self {
        Self::new(name, validator).source(Source::Path)
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Absent values are bound to the default (`null` unless set).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Only valid together with [`Param::optional`].
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn source_kind(&self) -> Source {
        self.source
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Builder for [`Binding`].
#[derive(Debug, Default)]
pub struct BindingBuilder {
    params: IndexMap<String, Param>,
    duplicates: Vec<String>,
    config: ValidationConfig,
}

impl BindingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the validated value of `param` to the destination `dest`.
    pub fn bind(mut self, dest: impl Into<String>, param: Param) -> Self {
        let dest = dest.into();
        if self.params.contains_key(&dest) {
            self.duplicates.push(dest);
        } else {
            self.params.insert(dest, param);
        }
        self
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Binding> {
        if let Some(dest) = self.duplicates.first() {
            return Err(ParamGuardError::configuration(format!(
                "Destination '{}' is bound more than once",
                dest
            )));
        }
        if self.config.max_body_size == 0 {
            return Err(ParamGuardError::configuration(
                "max_body_size must be greater than zero",
            ));
        }
        for param in self.params.values() {
            if param.default.is_some() && !param.optional {
                return Err(ParamGuardError::configuration(format!(
                    "Parameter '{}' has a default value but is not optional",
                    param.name
                )));
            }
        }

        let mut sources: Vec<Source> = Vec::new();
        for param in self.params.values() {
            if !sources.contains(&param.source) {
                sources.push(param.source);
            }
        }

        Ok(Binding {
            params: self.params,
            sources,
            config: self.config,
        })
    }
}

/// Result of evaluating a [`Binding`] against one request.
#[derive(Debug)]
pub enum BindOutcome {
    /// Every parameter passed; call the handler.
    Dispatch(BoundParams),
    /// At least one parameter failed, messages in declaration order.
    Reject(Vec<String>),
    /// A validator short-circuited the request.
    Aborted(Abort),
}

/// Immutable, shareable set of parameter bindings for one route.
#[derive(Debug, Clone)]
pub struct Binding {
    params: IndexMap<String, Param>,
    sources: Vec<Source>,
    config: ValidationConfig,
}

impl Binding {
    pub fn builder() -> BindingBuilder {
        BindingBuilder::new()
    }

    /// Sources read by at least one parameter.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(dest, param)| (dest.as_str(), param))
    }

    /// Validate every bound parameter of `request`.
    ///
    /// All parameters are attempted even after a failure, so a rejection
    /// lists every problem at once. An [`Abort`] stops immediately.
    pub fn evaluate(&self, request: &RequestParams) -> BindOutcome {
        tracing::debug!(params = self.params.len(), "Evaluating request parameters");

        let mut messages: Vec<String> = Vec::new();
        let mut bound = IndexMap::with_capacity(self.params.len());

        for (dest, param) in &self.params {
            match request.get(param.source, &param.name) {
                Some(value) => {
                    let ctx = FieldContext::new(param.name.as_str())
                        .with_source(param.source)
                        .with_request(request);
                    let mut errors = ValidationErrors::new();
                    match param.validator.validate(value.clone(), &ctx, &mut errors) {
                        Ok(value) if errors.is_empty() => {
                            bound.insert(dest.clone(), value);
                        }
                        Ok(_) => messages.extend(errors.messages()),
                        Err(abort) => {
                            tracing::debug!(
                                param = %param.name,
                                status = abort.status().as_u16(),
                                "Validation aborted"
                            );
                            return BindOutcome::Aborted(abort);
                        }
                    }
                }
                None if param.optional => {
                    bound.insert(dest.clone(), param.default.clone().unwrap_or(Value::Null));
                }
                None => messages.push(param.source.missing_message(&param.name)),
            }
        }

        if messages.is_empty() {
            BindOutcome::Dispatch(BoundParams { values: bound })
        } else {
            if self.config.log_rejections {
                tracing::info!(
                    errors = messages.len(),
                    messages = ?messages,
                    "Request parameters rejected"
                );
            }
            BindOutcome::Reject(messages)
        }
    }

    /// Wrap `handler` so it only runs with validated parameters.
    pub fn handler<F>(self, handler: F) -> ValidatedHandler<F> {
        validated(self, handler)
    }
}

/// Validated values keyed by destination name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    values: IndexMap<String, Value>,
}

impl BoundParams {
    /// Deserialize the value bound to `name`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ParamGuardError::internal(format!("No parameter bound to '{}'", name)))?;
        serde_json::from_value(value.clone()).map_err(|err| {
            ParamGuardError::internal(format!(
                "Parameter '{}' has an unexpected shape: {}",
                name, err
            ))
        })
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.values
    }
}

/// The request a validated handler is invoked for.
#[derive(Debug)]
pub struct RequestContext<S> {
    pub parts: Parts,
    pub state: S,
    pub params: RequestParams,
}

/// An axum handler guarded by a [`Binding`].
#[derive(Debug)]
pub struct ValidatedHandler<F> {
    binding: Arc<Binding>,
    handler: F,
}

impl<F: Clone> Clone for ValidatedHandler<F> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
            handler: self.handler.clone(),
        }
    }
}

/// Wrap `handler` so it only runs with parameters accepted by `binding`.
pub fn validated<F>(binding: Binding, handler: F) -> ValidatedHandler<F> {
    ValidatedHandler {
        binding: Arc::new(binding),
        handler,
    }
}

#[doc(hidden)]
pub enum ValidatedMarker {}

impl<F, Fut, Res, S> Handler<ValidatedMarker, S> for ValidatedHandler<F>
where
    F: Fn(RequestContext<S>, BoundParams) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
    S: Clone + Send + Sync + 'static,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, req: Request, state: S) -> Self::Future {
        Box::pin(async move {
            let binding = self.binding;
            let (mut parts, body) = req.into_parts();

            let params = match RequestParams::extract(
                &mut parts,
                body,
                &state,
                binding.sources(),
                binding.config().max_body_size,
            )
            .await
            {
                Ok(params) => params,
                Err(err) => return err.into_response(),
            };

            match binding.evaluate(&params) {
                BindOutcome::Dispatch(bound) => {
                    let ctx = RequestContext {
                        parts,
                        state,
                        params,
                    };
                    (self.handler)(ctx, bound).await.into_response()
                }
                BindOutcome::Reject(messages) => ParamGuardError::invalid(messages).into_response(),
                BindOutcome::Aborted(abort) => abort.into_response(),
            }
        })
    }
}

//! Request parameter bags.

use std::fmt;

use axum::{
    body::Body,
    extract::{FromRequestParts, RawPathParams},
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ParamGuardError, Result};

/// Key/value collection of one request source.
pub type Bag = Map<String, Value>;

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The query string.
    Query,
    /// The request body, decoded as a JSON object.
    #[default]
    Json,
    /// The request body, decoded as `application/x-www-form-urlencoded`.
    Form,
    /// Variables captured by the matched route.
    Path,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Json => "json",
            Self::Form => "form",
            Self::Path => "path",
        }
    }

    /// Message recorded when a required parameter is absent.
    pub fn missing_message(&self, name: &str) -> String {
        match self {
            Self::Json => format!("Missing parameter: {}", name),
            other => format!("Missing {} parameter: {}", other.label(), name),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four parameter bags of one request.
///
/// Query, form and path values are always strings; JSON values keep their
/// decoded type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    query: Bag,
    json: Bag,
    form: Bag,
    path: Bag,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        insert_strings(&mut self.query, pairs);
        self
    }

    /// Use `body` as the JSON bag. Only objects are accepted.
    pub fn with_json(mut self, body: Value) -> Result<Self> {
        match body {
            Value::Object(map) => {
                self.json = map;
                Ok(self)
            }
            _ => Err(ParamGuardError::invalid(["Request body must be a JSON object."])),
        }
    }

    pub fn with_form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        insert_strings(&mut self.form, pairs);
        self
    }

    pub fn with_path<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        insert_strings(&mut self.path, pairs);
        self
    }

    pub fn bag(&self, source: Source) -> &Bag {
        match source {
            Source::Query => &self.query,
            Source::Json => &self.json,
            Source::Form => &self.form,
            Source::Path => &self.path,
        }
    }

    pub fn get(&self, source: Source, name: &str) -> Option<&Value> {
        self.bag(source).get(name)
    }

    /// Read the bags named in `sources` from an incoming request.
    ///
    /// The body is only buffered when a body source is requested. If a
    /// binding reads both JSON and form parameters, the `Content-Type`
    /// header decides which of the two the body fills.
    pub async fn extract<S>(
        parts: &mut Parts,
        body: Body,
        state: &S,
        sources: &[Source],
        max_body_size: usize,
    ) -> Result<Self>
    where
        S: Send + Sync,
    {
        let mut params = Self::new();

        if sources.contains(&Source::Query) {
            let query = parts.uri.query().unwrap_or_default();
            let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
                .map_err(|_| ParamGuardError::invalid(["Query string is malformed."]))?;
            insert_strings(&mut params.query, pairs);
        }

        if sources.contains(&Source::Path) {
            match RawPathParams::from_request_parts(parts, state).await {
                Ok(raw) => {
                    for (key, value) in &raw {
                        params.path.insert(key.to_string(), Value::String(value.to_string()));
                    }
                }
                Err(rejection) => {
                    tracing::debug!(error = %rejection, "No path parameters available");
                }
            }
        }

        let wants_json = sources.contains(&Source::Json);
        let wants_form = sources.contains(&Source::Form);
        if !(wants_json || wants_form) {
            return Ok(params);
        }

        let bytes = axum::body::to_bytes(body, max_body_size).await.map_err(|_| {
            ParamGuardError::invalid([format!("Request body exceeds {} bytes.", max_body_size)])
        })?;

        let form_body = wants_form && (!wants_json || is_form_encoded(parts));
        if form_body {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&bytes)
                .map_err(|_| ParamGuardError::invalid(["Request body must be form encoded."]))?;
            insert_strings(&mut params.form, pairs);
        } else if !bytes.is_empty() {
            let body: Value = serde_json::from_slice(&bytes)
                .map_err(|_| ParamGuardError::invalid(["Request body must be JSON."]))?;
            params = params.with_json(body)?;
        }

        Ok(params)
    }
}

fn insert_strings<K, V>(bag: &mut Bag, pairs: impl IntoIterator<Item = (K, V)>)
where
    K: Into<String>,
    V: Into<String>,
{
    for (key, value) in pairs {
        bag.insert(key.into(), Value::String(value.into()));
    }
}

fn is_form_encoded(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

use std::fmt;

use crate::http::{RequestParams, Source};
use crate::validation::errors::{FieldError, ValidationErrors};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// The parameter name; only ever the first segment.
    Name(String),
    Index(usize),
}

/// Address of the value under validation, e.g. `tags` or `tags[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Name(name.into())],
        }
    }

    /// Path of the element at `index` below this one.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                PathSegment::Name(name) => f.write_str(name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Call-scoped state handed down a validator tree.
///
/// Validators never store where they are being applied; combinators derive a
/// child context instead. A validator tree can therefore be shared by any
/// number of concurrent requests.
#[derive(Debug, Clone)]
pub struct FieldContext<'r> {
    path: FieldPath,
    source: Source,
    request: Option<&'r RequestParams>,
}

impl<'r> FieldContext<'r> {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            path: FieldPath::new(param),
            source: Source::default(),
            request: None,
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    pub fn with_request(mut self, request: &'r RequestParams) -> Self {
        self.request = Some(request);
        self
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The bag the top-level value was read from.
    pub fn source(&self) -> Source {
        self.source
    }

    /// All parameters of the current request, when validating one.
    pub fn request(&self) -> Option<&'r RequestParams> {
        self.request
    }

    /// Context for element `index` of a list.
    pub fn element(&self, index: usize) -> Self {
        Self {
            path: self.path.index(index),
            source: self.source,
            request: self.request,
        }
    }

    /// Build an error attributed to the current path.
    pub fn error(&self, message: impl Into<String>) -> FieldError {
        FieldError::new(self.path.to_string(), message)
    }

    pub fn add_error(&self, errors: &mut ValidationErrors, message: impl Into<String>) {
        errors.push(self.error(message));
    }
}

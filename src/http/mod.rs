//! HTTP side of parameter validation.
//!
//! [`RequestParams`] reads the query string, body and route variables of a
//! request into bags; [`Binding`] validates them and guards an axum handler.

mod binding;
mod source;

pub use binding::{
    BindOutcome, Binding, BindingBuilder, BoundParams, Param, RequestContext, ValidatedHandler,
    ValidatedMarker, validated,
};
pub use source::{Bag, RequestParams, Source};

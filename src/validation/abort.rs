use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ParamGuardError;

/// Ends a validation pass early and replaces its outcome with a response.
///
/// Returned as the `Err` side of [`Validator::validate`](crate::Validator::validate),
/// so it propagates through combinators with `?` and skips error aggregation.
pub struct Abort {
    response: Response,
}

impl Abort {
    pub fn new(response: impl IntoResponse) -> Self {
        Self {
            response: response.into_response(),
        }
    }

    /// Abort with the standard 404 error body.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ParamGuardError::not_found(msg))
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }
}

impl fmt::Debug for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Abort")
            .field("status", &self.response.status())
            .finish_non_exhaustive()
    }
}

impl IntoResponse for Abort {
    fn into_response(self) -> Response {
        self.response
    }
}

//! paramguard - declarative request parameter validation for Axum
//!
//! Handlers declare the parameters they need, where each one comes from and
//! how it is checked. paramguard reads them from the request, validates and
//! coerces them, and only calls the handler when every parameter passed.
//! Otherwise the client gets a single 400 listing every problem.
//!
//! # Features
//!
//! - **Validators**: equality, enumerations, integer text, strings with
//!   trimming, length limits and pattern checks
//! - **Combinators**: `And`, `Or` and element-wise `List`
//! - **Sources**: query string, JSON body, form body and route variables
//! - **Abort**: validators can replace the whole response, e.g. with a 404
//! - **Testing**: Alba-style HTTP scenarios
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{Json, Router, routing::get};
//! use paramguard::http::{Binding, BoundParams, Param, RequestContext};
//! use paramguard::validation::{Text, TextNumber};
//! use paramguard::ConfigBuilder;
//! use serde_json::{Value, json};
//!
//! async fn search(
//!     _ctx: RequestContext<()>,
//!     params: BoundParams,
//! ) -> paramguard::Result<Json<Value>> {
//!     let q: String = params.get("q")?;
//!     let page: i64 = params.get("page")?;
//!     Ok(Json(json!({ "q": q, "page": page })))
//! }
//!
//! #[tokio::main]
//! async fn main() -> paramguard::Result<()> {
//!     let config = ConfigBuilder::new().from_env().build()?;
//!     paramguard::init_tracing_with_config(&config);
//!
//!     let binding = Binding::builder()
//!         .bind("q", Param::query("q", Text::string().min_length(1)))
//!         .bind(
//!             "page",
//!             Param::query("page", TextNumber::new().min_value(1))
//!                 .optional()
//!                 .default_value(1),
//!         )
//!         .with_config(config.validation.clone())
//!         .build()?;
//!
//!     let app: Router = Router::new().route("/search", get(binding.handler(search)));
//!     # let _ = app;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod http;
pub mod testing;
mod utils;
pub mod validation;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, LoggingConfig, ValidationConfig};
pub use error::{ErrorResponse, INVALID_REQUEST, ParamGuardError, Result};
pub use http::{Binding, BoundParams, Param, RequestContext, RequestParams, Source, validated};
pub use validation::{Abort, Check, FieldContext, FieldError, ValidationErrors, Validator};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "paramguard=debug")
/// - `PARAMGUARD_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = utils::get_env_with_prefix("LOG_JSON")
        .and_then(|v| utils::parse_flag(&v))
        .unwrap_or(false);

    install(env_filter, json_logs);
}

/// Initialize tracing from a [`Config`]
pub fn init_tracing_with_config(config: &Config) {
    install(EnvFilter::new(&config.logging.level), config.logging.json);
}

fn install(env_filter: EnvFilter, json: bool) {
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

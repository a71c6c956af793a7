//! Declarative validators for request parameters.
//!
//! A [`Validator`] checks one value and may also coerce it: `TextNumber`
//! turns `"42"` into `42`, `Text` trims and lowercases. Failures are
//! collected into [`ValidationErrors`] rather than returned, so one pass
//! reports every problem with a request. An [`Abort`] ends the pass early
//! with a ready-made response.
//!
//! # Example
//!
//! ```rust
//! use paramguard::validation::{Text, TextNumber, Validator};
//! use serde_json::json;
//!
//! let age = Validator::from(TextNumber::new().min_value(0).max_value(150));
//! let checked = age.check("age", json!(" 42 ")).unwrap();
//! assert!(checked.is_valid());
//! assert_eq!(checked.value, json!(42));
//!
//! let tags = Validator::from(Validator::list(Text::string().lowercase()).max_elements(2));
//! let checked = tags.check("tags", json!(["A", " b ", "c"])).unwrap();
//! assert_eq!(checked.value, json!(["a", "b", "c"]));
//! assert_eq!(checked.errors.len(), 1);
//! ```

mod abort;
mod combinators;
mod context;
mod errors;
mod lookup;
mod validator;
mod validators;

pub use abort::Abort;
pub use combinators::{And, List, Or};
pub use context::{FieldContext, FieldPath, PathSegment};
pub use errors::{FieldError, ValidationErrors};
pub use lookup::Lookup;
pub use validator::{Check, Checked, Validator};
pub use validators::{Equals, OneOf, Text, TextNumber};

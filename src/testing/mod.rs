//! Testing utilities for validated endpoints
//!
//! Alba-style HTTP scenarios: build a request, run it through a `Router`
//! without starting a server and assert on the response.
//!
//! # Example
//!
//! ```rust,ignore
//! use paramguard::testing;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_missing_name() {
//!     testing::put(app(), "/item")
//!         .json_body(&json!({}))
//!         .execute()
//!         .await
//!         .assert_bad_request()
//!         .assert_messages(&["Missing parameter: name"])
//!         .await;
//! }
//! ```

mod scenario;

pub use scenario::{Scenario, ScenarioAssert, get, post, put};

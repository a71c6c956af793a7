//! Alba-style scenarios for validated endpoints
//!
//! A [`Scenario`] builds one request, runs it through a `Router` without
//! starting a server and returns a [`ScenarioAssert`] for fluent checks,
//! including the `messages` list of a rejected request.
//!
//! # Example
//!
//! ```rust,ignore
//! let binding = Binding::builder()
//!     .bind("name", Param::new("name", Text::string().min_length(1)))
//!     .build()?;
//! let app = Router::new().route("/item", routing::put(binding.handler(create)));
//!
//! testing::put(app, "/item")
//!     .json_body(&json!({}))
//!     .execute()
//!     .await
//!     .assert_bad_request()
//!     .assert_messages(&["Missing parameter: name"])
//!     .await;
//! ```

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

/// Request builder for a single endpoint test
pub struct Scenario {
    app: Router,
    request: Request<Body>,
}

impl Scenario {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            request: Request::builder()
                .method(Method::GET)
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        *self.request.method_mut() = method;
        self
    }

    pub fn uri(mut self, uri: &str) -> Self {
        *self.request.uri_mut() = uri.parse().unwrap();
        self
    }

    /// Append URL-encoded query parameters to the request URI
    pub fn with_query(mut self, params: &[(&str, &str)]) -> Self {
        let uri = self.request.uri().clone();
        let mut query_parts = vec![];

        if let Some(query) = uri.query() {
            query_parts.push(query.to_string());
        }
        for (key, value) in params {
            query_parts.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ));
        }

        let path = uri.path();
        let new_uri = if query_parts.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query_parts.join("&"))
        };

        *self.request.uri_mut() = new_uri.parse().unwrap();
        self
    }

    /// Set a JSON body from a serializable value
    pub fn json_body<T: Serialize>(mut self, body: &T) -> Self {
        let json = serde_json::to_string(body).unwrap();
        *self.request.body_mut() = Body::from(json);
        self.request
            .headers_mut()
            .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        self
    }

    /// Set an `application/x-www-form-urlencoded` body
    pub fn form_body(mut self, params: &[(&str, &str)]) -> Self {
        let encoded = serde_urlencoded::to_string(params).unwrap();
        *self.request.body_mut() = Body::from(encoded);
        self.request.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self
    }

    /// Set a raw body, e.g. to send malformed input
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        *self.request.body_mut() = Body::from(body.into());
        self
    }

    pub async fn execute(self) -> ScenarioAssert {
        let response = self.app.oneshot(self.request).await.unwrap();
        ScenarioAssert { response }
    }
}

/// Assertion builder for a scenario's response
pub struct ScenarioAssert {
    response: Response,
}

impl ScenarioAssert {
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.response.status(),
            expected,
            "Expected status {}, got {}",
            expected,
            self.response.status()
        );
        self
    }

    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_created(self) -> Self {
        self.assert_status(StatusCode::CREATED)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_header(self, key: &str, expected: &str) -> Self {
        let value = self
            .response
            .headers()
            .get(key)
            .unwrap_or_else(|| panic!("Header '{}' not found", key))
            .to_str()
            .unwrap();
        assert_eq!(value, expected, "Header '{}' value mismatch", key);
        self
    }

    pub fn assert_json(self) -> Self {
        let content_type = self
            .response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("Content-Type header not found")
            .to_str()
            .unwrap();
        assert!(
            content_type.contains("application/json"),
            "Expected JSON content type, got: {}",
            content_type
        );
        self
    }

    pub async fn body_bytes(self) -> Vec<u8> {
        axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    pub async fn body_string(self) -> String {
        String::from_utf8(self.body_bytes().await).unwrap()
    }

    pub async fn json<T: for<'de> Deserialize<'de>>(self) -> T {
        let bytes = self.body_bytes().await;
        serde_json::from_slice(&bytes).expect("Failed to parse JSON response")
    }

    /// Assert a JSON field using dot notation, e.g. `item.name` or `messages.0`
    pub async fn assert_json_path(self, path: &str, expected: serde_json::Value) -> Self {
        let (json, rebuilt) = self.take_json().await;

        let actual = json_path_get(&json, path)
            .unwrap_or_else(|| panic!("Path '{}' not found in JSON", path));
        assert_eq!(actual, &expected, "JSON path '{}' value mismatch", path);

        rebuilt
    }

    /// Assert the exact, ordered `messages` of a rejected request
    pub async fn assert_messages(self, expected: &[&str]) -> Self {
        let (json, rebuilt) = self.take_json().await;

        let messages: Vec<String> = json
            .get("messages")
            .cloned()
            .map(|value| {
                serde_json::from_value(value).expect("`messages` is not a list of strings")
            })
            .unwrap_or_else(|| panic!("Response has no `messages`: {}", json));
        assert_eq!(messages, expected, "Rejection messages mismatch");

        rebuilt
    }

    pub async fn assert_contains(self, text: &str) -> Self {
        let (bytes, rebuilt) = self.buffer().await;
        let body = String::from_utf8_lossy(&bytes);
        assert!(
            body.contains(text),
            "Response body does not contain '{}'. Body: {}",
            text,
            body
        );
        rebuilt
    }

    async fn take_json(self) -> (serde_json::Value, Self) {
        let (bytes, rebuilt) = self.buffer().await;
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (json, rebuilt)
    }

    /// Read the body and hand back an equivalent response (status and
    /// headers kept) so assertions can keep chaining.
    async fn buffer(self) -> (Bytes, Self) {
        let (parts, body) = self.response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let response = Response::from_parts(parts, Body::from(bytes.clone()));
        (bytes, Self { response })
    }
}

fn json_path_get<'a>(json: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = json;
    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(index) => current.get(index)?,
            Err(_) => current.get(part)?,
        };
    }
    Some(current)
}

pub fn get(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::GET).uri(uri)
}

pub fn post(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::POST).uri(uri)
}

pub fn put(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::PUT).uri(uri)
}

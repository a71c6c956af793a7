//! A small item store wired up with validated handlers.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use paramguard::http::{Binding, BoundParams, Param, RequestContext};
use paramguard::testing;
use paramguard::validation::{Text, TextNumber};
use paramguard::{ParamGuardError, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Item {
    id: i64,
    name: String,
    value: String,
}

#[derive(Clone, Default)]
struct Store {
    items: Arc<Mutex<BTreeMap<i64, Item>>>,
}

impl Store {
    fn seeded() -> Self {
        let store = Self::default();
        store.insert("apple", "so many varieties");
        store.insert("banana", "better when slightly brown");
        store
    }

    fn insert(&self, name: &str, value: &str) -> Item {
        let mut items = self.items.lock().unwrap();
        let id = items.keys().next_back().map_or(0, |id| id + 1);
        let item = Item {
            id,
            name: name.to_string(),
            value: value.to_string(),
        };
        items.insert(id, item.clone());
        item
    }

    fn fetch(&self, id: &Value) -> Option<Value> {
        let id = id.as_i64()?;
        let items = self.items.lock().unwrap();
        items.get(&id).and_then(|item| serde_json::to_value(item).ok())
    }
}

async fn item_create(
    ctx: RequestContext<Store>,
    params: BoundParams,
) -> paramguard::Result<Response> {
    let name: String = params.get("name")?;
    let value: String = params.get("value")?;
    let item = ctx.state.insert(&name, &value);
    let location = format!("/item/{}", item.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)).into_response())
}

async fn item_view(
    _ctx: RequestContext<Store>,
    params: BoundParams,
) -> paramguard::Result<Json<Item>> {
    Ok(Json(params.get("item")?))
}

async fn item_list(State(store): State<Store>) -> Json<Vec<Item>> {
    Json(store.items.lock().unwrap().values().cloned().collect())
}

fn item_id(store: &Store) -> Validator {
    let store = store.clone();
    Validator::lookup("Item", TextNumber::new().min_value(0), move |id| store.fetch(id))
}

fn app(store: Store) -> Router {
    let create = Binding::builder()
        .bind("name", Param::new("name", Text::string().min_length(1).max_length(10)))
        .bind(
            "value",
            Param::new("value", Text::string().min_length(5).max_length(128))
                .optional()
                .default_value("...No value specified..."),
        )
        .build()
        .unwrap();

    let view = Binding::builder()
        .bind("item", Param::path("item_id", item_id(&store)))
        .build()
        .unwrap();

    let copy = Binding::builder()
        .bind("item", Param::query("from", item_id(&store)))
        .bind("name", Param::form("name", Text::string().min_length(1).max_length(10)))
        .build()
        .unwrap();

    Router::new()
        .route("/item", put(create.handler(item_create)).get(item_list))
        .route("/item/{item_id}", get(view.handler(item_view)))
        .route("/form_item", put(copy.handler(copy_item)))
        .with_state(store)
}

async fn copy_item(
    ctx: RequestContext<Store>,
    params: BoundParams,
) -> paramguard::Result<Response> {
    let source: Item = params.get("item")?;
    let name: String = params.get("name")?;
    if name == source.name {
        return Err(ParamGuardError::bad_request("Copy needs a new name"));
    }
    let item = ctx.state.insert(&name, &source.value);
    Ok((StatusCode::CREATED, Json(item)).into_response())
}

#[tokio::test]
async fn test_create_item_with_default_value() {
    let store = Store::seeded();

    testing::put(app(store.clone()), "/item")
        .json_body(&json!({"name": " cherry "}))
        .execute()
        .await
        .assert_created()
        .assert_header("location", "/item/2")
        .assert_json_path("value", json!("...No value specified..."))
        .await;

    let item = store.fetch(&json!(2)).unwrap();
    assert_eq!(item["name"], "cherry");
}

#[tokio::test]
async fn test_create_item_rejects_bad_lengths() {
    testing::put(app(Store::seeded()), "/item")
        .json_body(&json!({"name": "a-very-long-name", "value": "tiny"}))
        .execute()
        .await
        .assert_bad_request()
        .assert_messages(&[
            "Validation error on param 'name': must be <= 10 characters",
            "Validation error on param 'value': must be >= 5 characters",
        ])
        .await;
}

#[tokio::test]
async fn test_view_item() {
    testing::get(app(Store::seeded()), "/item/1")
        .execute()
        .await
        .assert_ok()
        .assert_json_path("name", json!("banana"))
        .await;
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    testing::get(app(Store::seeded()), "/item/42")
        .execute()
        .await
        .assert_not_found()
        .assert_json_path("error", json!("Not found: Item not found"))
        .await;
}

#[tokio::test]
async fn test_malformed_item_id_is_not_found() {
    testing::get(app(Store::seeded()), "/item/abc")
        .execute()
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_lookup_outside_path_reports_error() {
    testing::put(app(Store::seeded()), "/form_item")
        .with_query(&[("from", "9")])
        .form_body(&[("name", "grape")])
        .execute()
        .await
        .assert_bad_request()
        .assert_messages(&["Validation error on param 'from': Invalid Item"])
        .await;
}

#[tokio::test]
async fn test_copy_item_from_query_and_form() {
    let store = Store::seeded();

    testing::put(app(store.clone()), "/form_item")
        .with_query(&[("from", "0")])
        .form_body(&[("name", "crabapple")])
        .execute()
        .await
        .assert_created()
        .assert_json_path("value", json!("so many varieties"))
        .await;

    testing::put(app(store), "/form_item")
        .with_query(&[("from", "0")])
        .form_body(&[("name", "apple")])
        .execute()
        .await
        .assert_bad_request()
        .assert_json_path("error", json!("Bad request: Copy needs a new name"))
        .await;
}

#[tokio::test]
async fn test_list_items() {
    let items: Vec<Item> = testing::get(app(Store::seeded()), "/item")
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["apple", "banana"]);
}

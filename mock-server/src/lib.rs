use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Key the default app accepts.
pub const API_KEY: &str = "test-key";

pub const CONTENT_TAGS: [&str; 7] = [
    "news",
    "photos",
    "user_reviews",
    "critic_reviews",
    "status_updates",
    "events",
    "real_estate",
];

pub struct Db {
    api_key: String,
    places: BTreeMap<String, Value>,
}

pub type Shared = Arc<RwLock<Db>>;

type Reply = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "message": message })))
}

pub fn app() -> Router {
    app_with_key(API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let places = seed_places()
        .into_iter()
        .filter_map(|p| Some((p["uuid"].as_str()?.to_string(), p)))
        .collect();
    let db: Shared = Arc::new(RwLock::new(Db {
        api_key: api_key.to_string(),
        places,
    }));
    Router::new()
        .route("/categories.json", get(categories))
        .route("/location.json", get(location))
        .route("/places.json", get(list_places))
        .route(
            "/places/{file}",
            get(get_place).post(update_place).delete(delete_place),
        )
        .route("/content.json", get(content))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub fn seed_places() -> Vec<Value> {
    vec![
        json!({
            "uuid": "304f36b-70c6-68ac-245f-11c9b17eafdfa",
            "name": "Blue Bottle Coffee",
            "lat": 37.782,
            "lng": -122.407,
            "phone_number": "415-555-0100",
            "link": "http://example.com/places/blue-bottle",
            "country": "US",
            "province": "CA",
            "city": "San Francisco",
            "postal_code": "94103",
            "address": "66 Mint St",
            "facebook_id": "bluebottle",
            "categories": [
                {"category_id": "2", "name": "Coffee", "parent_id": "1"}
            ]
        }),
        json!({
            "uuid": "17f5fcd-3312-7a52-f551-d4e8f70dbc8a9",
            "name": "Zeitgeist",
            "lat": 37.770,
            "lng": -122.422,
            "phone_number": null,
            "link": "http://example.com/places/zeitgeist",
            "country": "US",
            "province": "CA",
            "city": "San Francisco",
            "postal_code": "94117",
            "categories": [
                {"category_id": "5", "name": "Nightlife"},
                {"category_id": "6", "name": "Bars", "parent_id": "5"}
            ]
        }),
    ]
}

fn category_tree() -> Value {
    json!({
        "categories": [
            {"category_id": "1", "name": "Food", "categories": [
                {"category_id": "2", "name": "Coffee", "parent_id": "1"},
                {"category_id": "3", "name": "Bakery", "parent_id": "1", "categories": [
                    {"category_id": "4", "name": "Bagels", "parent_id": "3"}
                ]}
            ]},
            {"category_id": "5", "name": "Nightlife", "categories": [
                {"category_id": "6", "name": "Bars", "parent_id": "5"}
            ]}
        ]
    })
}

fn content_fixture(tag: &str) -> Value {
    match tag {
        "news" => json!([
            {"uuid": "n1", "title": "Market St reopens", "body": "Cars are out.", "author": "Staff",
             "published_at": "2011-04-02 10:00:00", "link": "http://example.com/n1", "source": "SF Daily",
             "lat": 37.78, "lng": -122.40}
        ]),
        "photos" => json!([
            {"uuid": "p1", "title": "Bay Bridge", "image": "http://img.example.com/p1.jpg",
             "thumbnail": "http://img.example.com/p1_t.jpg"}
        ]),
        "user_reviews" => json!([
            {"uuid": "ur1", "title": "Great pour-over", "rating": 5}
        ]),
        "critic_reviews" => json!([
            {"uuid": "cr1", "title": "Overrated", "rating": "2.5"}
        ]),
        "status_updates" => json!([
            {"uuid": "s1", "body": "at the park"},
            {"uuid": "s2", "body": "still at the park"}
        ]),
        "events" => json!([
            {"uuid": "e1", "title": "Jazz night", "local_start_time": "2011-05-01 19:00:00",
             "local_end_time": "2011-05-01 23:00:00"}
        ]),
        "real_estate" => json!([
            {"uuid": "r1", "title": "2BR condo", "location": "SoMa", "price": 650000,
             "number_of_beds": 2, "number_of_baths": 1.5, "square_feet": 980, "property_type": "condo"}
        ]),
        _ => json!([]),
    }
}

fn check_key(db: &Db, params: &HashMap<String, String>) -> Result<(), Reply> {
    match params.get("api_key") {
        Some(key) if *key == db.api_key => Ok(()),
        _ => Err(error(StatusCode::UNAUTHORIZED, "invalid api key")),
    }
}

fn place_uuid(file: &str) -> Result<&str, Reply> {
    file.strip_suffix(".json")
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "not found"))
}

fn has_category(place: &Value, ids: &[&str]) -> bool {
    place["categories"]
        .as_array()
        .map(|cats| {
            cats.iter()
                .any(|c| c["category_id"].as_str().is_some_and(|id| ids.contains(&id)))
        })
        .unwrap_or(false)
}

fn paginate(items: Vec<Value>, params: &HashMap<String, String>) -> Vec<Value> {
    let page_size: usize = params
        .get("page_size")
        .and_then(|s| s.parse().ok())
        .unwrap_or(usize::MAX);
    let page: usize = params
        .get("page")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
        .max(1);
    items
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect()
}

async fn categories(State(db): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Reply {
    let db = db.read().await;
    if let Err(reply) = check_key(&db, &params) {
        return reply;
    }
    (StatusCode::OK, Json(category_tree()))
}

async fn location(State(db): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Reply {
    let db = db.read().await;
    if let Err(reply) = check_key(&db, &params) {
        return reply;
    }
    if !params.contains_key("lat") || !params.contains_key("lng") {
        return error(StatusCode::BAD_REQUEST, "lat and lng are required");
    }
    (
        StatusCode::OK,
        Json(json!({
            "country": "US",
            "province": "CA",
            "city": "San Francisco",
            "locality": "SoMa",
            "postal_code": "94103"
        })),
    )
}

async fn list_places(State(db): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Reply {
    let db = db.read().await;
    if let Err(reply) = check_key(&db, &params) {
        return reply;
    }
    let has_selector = params.contains_key("lat")
        || params.contains_key("postal_code")
        || params.contains_key("country");
    if !has_selector {
        return error(StatusCode::BAD_REQUEST, "a location is required");
    }

    let category_ids: Vec<&str> = params
        .get("categories")
        .map(|s| s.split(',').collect())
        .unwrap_or_default();
    let places: Vec<Value> = db
        .places
        .values()
        .filter(|p| match params.get("postal_code") {
            Some(code) => p["postal_code"].as_str() == Some(code.as_str()),
            None => true,
        })
        .filter(|p| category_ids.is_empty() || has_category(p, &category_ids))
        .cloned()
        .collect();
    (StatusCode::OK, Json(json!({ "places": paginate(places, &params) })))
}

async fn get_place(
    State(db): State<Shared>,
    Path(file): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let db = db.read().await;
    if let Err(reply) = check_key(&db, &params) {
        return reply;
    }
    let uuid = match place_uuid(&file) {
        Ok(uuid) => uuid,
        Err(reply) => return reply,
    };
    match db.places.get(uuid) {
        Some(place) => (StatusCode::OK, Json(json!({ "place": place }))),
        None => error(StatusCode::NOT_FOUND, "not found"),
    }
}

const UPDATABLE: [&str; 9] = [
    "lat",
    "lng",
    "name",
    "city",
    "address",
    "country",
    "province",
    "postal_code",
    "phone_number",
];

async fn update_place(
    State(db): State<Shared>,
    Path(file): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Reply {
    let mut db = db.write().await;
    if let Err(reply) = check_key(&db, &params) {
        return reply;
    }
    let uuid = match place_uuid(&file) {
        Ok(uuid) => uuid.to_string(),
        Err(reply) => return reply,
    };
    let Some(place) = db.places.get_mut(&uuid) else {
        return error(StatusCode::NOT_FOUND, "not found");
    };
    let mut updated = Vec::new();
    for key in UPDATABLE {
        if let Some(value) = params.get(key) {
            let value = match key {
                "lat" | "lng" => value.parse::<f64>().map(Value::from).unwrap_or(Value::Null),
                _ => Value::from(value.as_str()),
            };
            place[key] = value;
            updated.push(key);
        }
    }
    tracing::debug!(%uuid, ?updated, "place updated");
    (
        StatusCode::OK,
        Json(json!({ "success": 1, "uuid": uuid, "updated": updated })),
    )
}

async fn delete_place(
    State(db): State<Shared>,
    Path(file): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let mut db = db.write().await;
    if let Err(reply) = check_key(&db, &params) {
        return reply;
    }
    let uuid = match place_uuid(&file) {
        Ok(uuid) => uuid.to_string(),
        Err(reply) => return reply,
    };
    match db.places.remove(&uuid) {
        Some(_) => (StatusCode::OK, Json(json!({ "success": 1 }))),
        None => error(StatusCode::NOT_FOUND, "not found"),
    }
}

async fn content(State(db): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Reply {
    let db = db.read().await;
    if let Err(reply) = check_key(&db, &params) {
        return reply;
    }
    let Some(requested) = params.get("content_types") else {
        return error(StatusCode::BAD_REQUEST, "content_types is required");
    };
    let tags: Vec<&str> = if requested == "all" {
        CONTENT_TAGS.to_vec()
    } else {
        requested
            .split(',')
            .filter(|t| CONTENT_TAGS.contains(t))
            .collect()
    };
    let query = params.get("query").map(|q| q.to_lowercase());

    let mut body = serde_json::Map::new();
    for tag in tags {
        let items: Vec<Value> = content_fixture(tag)
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|item| match &query {
                Some(q) => item["title"]
                    .as_str()
                    .is_some_and(|t| t.to_lowercase().contains(q.as_str())),
                None => true,
            })
            .collect();
        if !items.is_empty() {
            body.insert(tag.to_string(), Value::Array(paginate(items, &params)));
        }
    }
    // Tags the client does not know about must be tolerated.
    body.insert("podcasts".to_string(), json!([{ "uuid": "pc1", "title": "ignored" }]));
    (StatusCode::OK, Json(Value::Object(body)))
}

//! Stateless HTTP request builder and response parser for the geo API.
//!
//! # Design
//! `GeoClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the round-trip, so the whole request-shaping and
//! response-mapping layer is deterministic and free of I/O.

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::content::{Content, ContentTypes};
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, FORM_CONTENT_TYPE};
use crate::mapper;
use crate::params::{ContentFilter, Params, PlaceFilter, Selector};
use crate::types::{Category, Location, Place, PlaceUpdate};

const CATEGORIES_PATH: &str = "/categories.json";
const LOCATION_PATH: &str = "/location.json";
const PLACES_PATH: &str = "/places.json";
const CONTENT_PATH: &str = "/content.json";

fn place_path(uuid: &str) -> String {
    format!("/places/{}.json", urlencoding::encode(uuid))
}

#[derive(Debug, Clone)]
pub struct GeoClient {
    config: ClientConfig,
}

impl GeoClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Assemble a request for `path`, adding the credentials to `params`.
    ///
    /// GET and DELETE carry the parameters as a query string, POST as a
    /// form-encoded body.
    pub fn build_request(&self, path: &str, mut params: Params, method: HttpMethod) -> HttpRequest {
        params.insert("api_key", &self.config.api_key);
        if let Some(user_id) = &self.config.user_id {
            params.insert_non_empty("user_id", user_id);
        }

        let url = format!("{}{path}", self.config.base_url);
        let encoded = params.to_query_string();
        let request = match method {
            HttpMethod::Post => HttpRequest {
                method,
                path: url,
                headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
                body: Some(encoded),
            },
            HttpMethod::Get | HttpMethod::Delete => HttpRequest {
                method,
                path: format!("{url}?{encoded}"),
                headers: Vec::new(),
                body: None,
            },
        };

        if self.config.debugging {
            debug!(method = %request.method, url = %request.path, post = ?request.body, "geo api request");
        }
        request
    }

    /// Decode a response body and reject any status other than 200.
    ///
    /// The body is decoded first, so an error page that is not JSON surfaces
    /// as `Error::Json` whatever its status.
    pub fn decode(&self, response: HttpResponse) -> Result<Value> {
        let parsed: Value = serde_json::from_str(&response.body).map_err(|e| {
            if self.config.debugging {
                debug!(status = response.status, body = %response.body, "undecodable geo api response");
            }
            Error::Json(e)
        })?;

        if response.status != 200 {
            let message = parsed
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| response.body.trim().to_string());
            return Err(Error::Api {
                status: response.status,
                message,
            });
        }
        Ok(parsed)
    }

    pub fn build_get_categories(&self) -> HttpRequest {
        self.build_request(CATEGORIES_PATH, Params::new(), HttpMethod::Get)
    }

    pub fn parse_get_categories(&self, response: HttpResponse) -> Result<Vec<Category>> {
        mapper::parse_categories(&self.decode(response)?)
    }

    pub fn build_get_location(&self, latitude: f64, longitude: f64) -> HttpRequest {
        let params = Selector::LatLng {
            latitude,
            longitude,
        }
        .to_params();
        self.build_request(LOCATION_PATH, params, HttpMethod::Get)
    }

    pub fn parse_get_location(&self, response: HttpResponse) -> Result<Location> {
        mapper::parse_location(&self.decode(response)?)
    }

    pub fn build_get_place(&self, uuid: &str) -> HttpRequest {
        self.build_request(&place_path(uuid), Params::new(), HttpMethod::Get)
    }

    pub fn parse_get_place(&self, response: HttpResponse) -> Result<Place> {
        let raw = self.decode(response)?;
        let place = raw
            .get("place")
            .ok_or_else(|| Error::MissingField("place".to_string()))?;
        mapper::parse_place(place)
    }

    /// Places near `selector`. A `Selector::Place` has no meaning here and
    /// is sent as-is; the server answers with an error.
    pub fn build_get_places(&self, selector: &Selector, filter: &PlaceFilter) -> HttpRequest {
        let mut params = selector.to_params();
        params.extend(filter.to_params());
        self.build_request(PLACES_PATH, params, HttpMethod::Get)
    }

    pub fn parse_get_places(&self, response: HttpResponse) -> Result<Vec<Place>> {
        mapper::parse_places(&self.decode(response)?)
    }

    pub fn build_update_place(&self, uuid: &str, update: &PlaceUpdate) -> HttpRequest {
        self.build_request(&place_path(uuid), update.to_params(), HttpMethod::Post)
    }

    /// The update endpoint's body is returned undecoded; its shape is not
    /// documented beyond being a JSON object.
    pub fn parse_update_place(&self, response: HttpResponse) -> Result<Value> {
        self.decode(response)
    }

    pub fn build_delete_place(&self, uuid: &str) -> HttpRequest {
        self.build_request(&place_path(uuid), Params::new(), HttpMethod::Delete)
    }

    /// `true` only when the body's `success` field is the integer `1`.
    pub fn parse_delete_place(&self, response: HttpResponse) -> Result<bool> {
        let raw = self.decode(response)?;
        Ok(raw.get("success").and_then(Value::as_i64) == Some(1))
    }

    pub fn build_get_content(
        &self,
        selector: &Selector,
        content_types: &ContentTypes,
        filter: &ContentFilter,
    ) -> HttpRequest {
        let mut params = selector.to_params();
        params.insert("content_types", content_types.to_param());
        params.extend(filter.to_params());
        self.build_request(CONTENT_PATH, params, HttpMethod::Get)
    }

    pub fn parse_get_content(&self, response: HttpResponse) -> Result<Vec<Content>> {
        Ok(mapper::parse_content_listing(&self.decode(response)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;
    use crate::types::Page;

    fn client() -> GeoClient {
        GeoClient::new(ClientConfig::new("secret").base_url("http://localhost:3000"))
    }

    #[test]
    fn get_injects_api_key_into_query() {
        let req = client().build_get_categories();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/categories.json?api_key=secret");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn user_id_is_added_when_configured() {
        let client = GeoClient::new(ClientConfig::new("secret").base_url("http://h").user_id("u-9"));
        let req = client.build_get_location(37.5, -122.25);
        assert_eq!(
            req.path,
            "http://h/location.json?api_key=secret&lat=37.5&lng=-122.25&user_id=u-9"
        );
    }

    #[test]
    fn post_sends_form_body() {
        let update = PlaceUpdate {
            name: Some("Blue Bottle".into()),
            ..PlaceUpdate::default()
        };
        let req = client().build_update_place("abc", &update);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/places/abc.json");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())]
        );
        assert_eq!(req.body.as_deref(), Some("api_key=secret&name=Blue%20Bottle"));
    }

    #[test]
    fn update_from_place_uses_short_coordinate_names() {
        let place = Place {
            uuid: "abc".into(),
            name: "Cafe".into(),
            latitude: 37.5,
            longitude: -122.25,
            phone_number: None,
            location: Location::new("US"),
            link: None,
            categories: Vec::new(),
            facebook_id: None,
            twitter_id: None,
        };
        let req = client().build_update_place(&place.uuid, &PlaceUpdate::from(&place));
        assert_eq!(
            req.body.as_deref(),
            Some("api_key=secret&country=US&lat=37.5&lng=-122.25&name=Cafe")
        );
    }

    #[test]
    fn delete_uses_query_string() {
        let req = client().build_delete_place("abc");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/places/abc.json?api_key=secret");
        assert!(req.body.is_none());
    }

    #[test]
    fn places_query_merges_selector_and_filter() {
        let req = client().build_get_places(
            &Selector::PostalCode("94117".into()),
            &PlaceFilter::new().page(Page::new(2, 5)).radius(3),
        );
        assert_eq!(
            req.path,
            "http://localhost:3000/places.json?api_key=secret&page=2&page_size=5&postal_code=94117&radius=3"
        );
    }

    #[test]
    fn content_query_carries_types() {
        let req = client().build_get_content(
            &Selector::Place("p-1".into()),
            &ContentTypes::from(vec![ContentType::News, ContentType::Photos]),
            &ContentFilter::new().search_query("jazz"),
        );
        assert_eq!(
            req.path,
            "http://localhost:3000/content.json?api_key=secret&content_types=news%2Cphotos&place_id=p-1&query=jazz"
        );
    }

    #[test]
    fn non_200_carries_server_message() {
        let err = client()
            .parse_get_place(HttpResponse::new(404, r#"{"message":"not found"}"#))
            .unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn non_200_without_json_is_a_json_error() {
        let err = client()
            .parse_get_categories(HttpResponse::new(500, "<html>Internal Server Error</html>"))
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)), "{err:?}");
    }

    #[test]
    fn non_200_json_without_message_uses_body_text() {
        let err = client()
            .parse_get_categories(HttpResponse::new(503, "{\"status\":\"down\"}\n"))
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 503, ref message } if message == r#"{"status":"down"}"#));
    }

    #[test]
    fn bad_json_is_a_json_error() {
        let err = client()
            .parse_get_categories(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn delete_success_requires_integer_one() {
        let c = client();
        assert!(c.parse_delete_place(HttpResponse::new(200, r#"{"success":1}"#)).unwrap());
        assert!(!c.parse_delete_place(HttpResponse::new(200, r#"{"success":0}"#)).unwrap());
        assert!(!c.parse_delete_place(HttpResponse::new(200, r#"{"success":"1"}"#)).unwrap());
        assert!(!c.parse_delete_place(HttpResponse::new(200, r#"{}"#)).unwrap());
        assert!(!c.parse_delete_place(HttpResponse::new(200, r#"{"success":true}"#)).unwrap());
    }

    #[test]
    fn single_place_is_unwrapped() {
        let body = r#"{"place":{"uuid":"u1","name":"N","link":null,"phone_number":null,
            "lat":1.0,"lng":2.0,"country":"US","categories":[]}}"#;
        let place = client().parse_get_place(HttpResponse::new(200, body)).unwrap();
        assert_eq!(place.uuid, "u1");
        assert_eq!(place.location.country, "US");
    }

    #[test]
    fn update_returns_raw_body() {
        let raw = client()
            .parse_update_place(HttpResponse::new(200, r#"{"success":1,"uuid":"u1"}"#))
            .unwrap();
        assert_eq!(raw["uuid"], "u1");
    }
}

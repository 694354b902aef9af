//! Blocking facade over `GeoClient` and `Transport`.
//!
//! Every call is one request: build, execute, parse. The "by X" variants only
//! differ in the `Selector` they hand to the shared places / content paths.

use serde_json::Value;

use crate::client::GeoClient;
use crate::config::ClientConfig;
use crate::content::{Content, ContentTypes};
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{ContentFilter, PlaceFilter, Selector};
use crate::transport::Transport;
use crate::types::{Category, Location, Place, PlaceUpdate};

#[derive(Debug, Clone)]
pub struct GeoApi {
    client: GeoClient,
    transport: Transport,
}

impl GeoApi {
    pub fn new(config: ClientConfig) -> Self {
        let transport = Transport::new(config.timeout);
        Self {
            client: GeoClient::new(config),
            transport,
        }
    }

    /// Shorthand for the default host with just an API key.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self::new(ClientConfig::new(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn client(&self) -> &GeoClient {
        &self.client
    }

    fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        self.transport.execute(&req)
    }

    /// The full category tree, flattened in pre-order.
    pub fn get_categories(&self) -> Result<Vec<Category>> {
        let response = self.send(self.client.build_get_categories())?;
        self.client.parse_get_categories(response)
    }

    /// Reverse-geocode a coordinate.
    pub fn get_location(&self, latitude: f64, longitude: f64) -> Result<Location> {
        let response = self.send(self.client.build_get_location(latitude, longitude))?;
        self.client.parse_get_location(response)
    }

    pub fn get_place(&self, uuid: &str) -> Result<Place> {
        let response = self.send(self.client.build_get_place(uuid))?;
        self.client.parse_get_place(response)
    }

    fn get_places(&self, selector: Selector, filter: &PlaceFilter) -> Result<Vec<Place>> {
        let response = self.send(self.client.build_get_places(&selector, filter))?;
        self.client.parse_get_places(response)
    }

    pub fn get_places_by_lat_lng(
        &self,
        latitude: f64,
        longitude: f64,
        filter: &PlaceFilter,
    ) -> Result<Vec<Place>> {
        self.get_places(
            Selector::LatLng {
                latitude,
                longitude,
            },
            filter,
        )
    }

    pub fn get_places_by_postal_code(&self, postal_code: &str, filter: &PlaceFilter) -> Result<Vec<Place>> {
        self.get_places(Selector::PostalCode(postal_code.to_string()), filter)
    }

    pub fn get_places_by_location(&self, location: &Location, filter: &PlaceFilter) -> Result<Vec<Place>> {
        self.get_places(Selector::Location(location.clone()), filter)
    }

    /// Overwrite the given fields of a place. The decoded body is returned
    /// as-is for the caller to inspect.
    pub fn update_place(&self, uuid: &str, update: &PlaceUpdate) -> Result<Value> {
        let response = self.send(self.client.build_update_place(uuid, update))?;
        self.client.parse_update_place(response)
    }

    /// Push every field of `place` (coordinates, name, phone, location).
    ///
    /// The form carries `lat` and `lng` (never `latitude`/`longitude`), plus
    /// `name`, `phone_number`, `country`, `province`, `city`, `postal_code`
    /// and `address`. Fields the place does not have are left out.
    pub fn update_place_given_place(&self, place: &Place) -> Result<Value> {
        self.update_place(&place.uuid, &PlaceUpdate::from(place))
    }

    pub fn delete_place(&self, uuid: &str) -> Result<bool> {
        let response = self.send(self.client.build_delete_place(uuid))?;
        self.client.parse_delete_place(response)
    }

    fn get_content(
        &self,
        selector: Selector,
        content_types: ContentTypes,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>> {
        let response = self.send(self.client.build_get_content(&selector, &content_types, filter))?;
        self.client.parse_get_content(response)
    }

    pub fn get_content_by_lat_lng(
        &self,
        latitude: f64,
        longitude: f64,
        content_types: impl Into<ContentTypes>,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>> {
        self.get_content(
            Selector::LatLng {
                latitude,
                longitude,
            },
            content_types.into(),
            filter,
        )
    }

    pub fn get_content_by_postal_code(
        &self,
        postal_code: &str,
        content_types: impl Into<ContentTypes>,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>> {
        self.get_content(
            Selector::PostalCode(postal_code.to_string()),
            content_types.into(),
            filter,
        )
    }

    pub fn get_content_by_location(
        &self,
        location: &Location,
        content_types: impl Into<ContentTypes>,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>> {
        self.get_content(Selector::Location(location.clone()), content_types.into(), filter)
    }

    pub fn get_content_by_place(
        &self,
        place_uuid: &str,
        content_types: impl Into<ContentTypes>,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>> {
        self.get_content(
            Selector::Place(place_uuid.to_string()),
            content_types.into(),
            filter,
        )
    }
}

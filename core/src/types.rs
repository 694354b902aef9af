//! Domain records for the geo API.
//!
//! # Design
//! Records are plain structs with public fields. The `Record` trait exposes
//! the same attributes as a key-value map (derived through `Serialize`), so a
//! caller can address a place either as `place.name` or as
//! `place.get("name")`. The map is a snapshot, not a live view.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::params::Params;

/// Wire format for `Range` bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Attribute-addressable view of a record.
pub trait Record: Serialize {
    /// Every attribute of the record keyed by its field name.
    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Look up one attribute by name.
    fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }
}

/// A postal location. Only `country` is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub province: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
}

impl Location {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Self::default()
        }
    }

    /// The present fields only, ready to seed a places or content query.
    pub fn query_params(&self) -> Params {
        let mut params = Params::new();
        params.insert_non_empty("country", &self.country);
        params.insert_opt("province", self.province.as_deref());
        params.insert_opt("city", self.city.as_deref());
        params.insert_opt("locality", self.locality.as_deref());
        params.insert_opt("postal_code", self.postal_code.as_deref());
        params.insert_opt("address", self.address.as_deref());
        params
    }
}

impl Record for Location {}

/// A node of the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

impl Category {
    pub fn new(category_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            name: name.into(),
            parent_id: None,
        }
    }
}

impl Record for Category {}

/// A point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub uuid: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone_number: Option<String>,
    pub location: Location,
    pub link: Option<String>,
    pub categories: Vec<Category>,
    pub facebook_id: Option<String>,
    pub twitter_id: Option<String>,
}

impl Record for Place {}

/// Pagination fragment: which page to fetch at which page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }
}

impl Record for Page {}

/// Date window fragment for content queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl Range {
    pub fn new(start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

impl Record for Range {}

/// Partial set of place attributes to overwrite with `update_place`.
/// `None` fields are left out of the POST body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceUpdate {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub phone_number: Option<String>,
    pub category: Option<String>,
}

impl PlaceUpdate {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(lat) = self.latitude {
            params.insert("lat", lat);
        }
        if let Some(lng) = self.longitude {
            params.insert("lng", lng);
        }
        params.insert_opt("name", self.name.as_deref());
        params.insert_opt("city", self.city.as_deref());
        params.insert_opt("address", self.address.as_deref());
        params.insert_opt("country", self.country.as_deref());
        params.insert_opt("province", self.province.as_deref());
        params.insert_opt("postal_code", self.postal_code.as_deref());
        params.insert_opt("phone_number", self.phone_number.as_deref());
        params.insert_opt("category", self.category.as_deref());
        params
    }
}

impl From<&Place> for PlaceUpdate {
    /// Full field set of an existing place, as sent by `update_place_given_place`.
    fn from(place: &Place) -> Self {
        let location = &place.location;
        Self {
            latitude: Some(place.latitude),
            longitude: Some(place.longitude),
            name: Some(place.name.clone()),
            city: location.city.clone(),
            address: location.address.clone(),
            country: Some(location.country.clone()),
            province: location.province.clone(),
            postal_code: location.postal_code.clone(),
            phone_number: place.phone_number.clone(),
            category: None,
        }
    }
}

//! Wire parameters and the filter fragments that produce them.
//!
//! A parameter is omitted when its source is `None`. Empty strings and empty
//! category lists count as absent too, since the server cannot act on them.
//! Numeric zero is a real value and goes on the wire verbatim (`radius=0`).

use std::collections::BTreeMap;

use crate::types::{Category, Location, Page, Range, DATE_FORMAT};

/// Ordered map of wire parameter name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Insert `value` unless it is `None` or empty.
    pub fn insert_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.insert_non_empty(key, value);
        }
    }

    pub fn insert_non_empty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.insert(key, value);
        }
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn extend(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering, also used for query strings.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Page> for Params {
    fn from(page: Page) -> Self {
        let mut params = Params::new();
        params.insert("page", page.page);
        params.insert("page_size", page.page_size);
        params
    }
}

impl From<Range> for Params {
    fn from(range: Range) -> Self {
        let mut params = Params::new();
        params.insert("start_date", range.start_date.format(DATE_FORMAT));
        params.insert("end_date", range.end_date.format(DATE_FORMAT));
        params
    }
}

/// What a places or content query is anchored on.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    LatLng { latitude: f64, longitude: f64 },
    PostalCode(String),
    Location(Location),
    /// Content attached to a place; not valid for places queries.
    Place(String),
}

impl Selector {
    pub fn to_params(&self) -> Params {
        match self {
            Selector::LatLng {
                latitude,
                longitude,
            } => {
                let mut params = Params::new();
                params.insert("lat", latitude);
                params.insert("lng", longitude);
                params
            }
            Selector::PostalCode(code) => [("postal_code", code.as_str())].into_iter().collect(),
            Selector::Location(location) => location.query_params(),
            Selector::Place(uuid) => [("place_id", uuid.as_str())].into_iter().collect(),
        }
    }
}

/// Optional narrowing for places queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceFilter {
    pub page: Option<Page>,
    /// Search radius in miles; the server defaults to 10.
    pub radius: Option<u32>,
    pub categories: Vec<String>,
}

impl PlaceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn categories<'a>(mut self, categories: impl IntoIterator<Item = &'a Category>) -> Self {
        self.categories = categories
            .into_iter()
            .map(|c| c.category_id.clone())
            .collect();
        self
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(page) = self.page {
            params.extend(page.into());
        }
        if let Some(radius) = self.radius {
            params.insert("radius", radius);
        }
        let ids: Vec<&str> = self
            .categories
            .iter()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
            .collect();
        if !ids.is_empty() {
            params.insert("categories", ids.join(","));
        }
        params
    }
}

/// Optional narrowing for content queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub page: Option<Page>,
    pub range: Option<Range>,
    pub sort_by: Option<String>,
    pub search_query: Option<String>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(page) = self.page {
            params.extend(page.into());
        }
        if let Some(range) = self.range {
            params.extend(range.into());
        }
        params.insert_opt("sort_by", self.sort_by.as_deref());
        params.insert_opt("query", self.search_query.as_deref());
        params
    }
}

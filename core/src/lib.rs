//! Blocking client for the geo places/content REST API.
//!
//! # Overview
//! Typed inputs (coordinates, postal codes, `Location`s, filters) are turned
//! into wire parameters, sent as GET/POST/DELETE with the API key attached,
//! and the JSON answers are mapped back into `Place`, `Category`, `Location`
//! and `Content` records.
//!
//! # Design
//! - `GeoClient` is pure: `build_*` produces an `HttpRequest`, `parse_*`
//!   consumes an `HttpResponse` (host-does-IO pattern).
//! - `Transport` runs a request over one reused `ureq::Agent`.
//! - `GeoApi` glues the two together, one request per call, no retries.
//! - Content items are a sum type (`ContentKind`) dispatched on the wire tag.

pub mod api;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod mapper;
pub mod params;
pub mod transport;
pub mod types;

pub use api::GeoApi;
pub use client::GeoClient;
pub use config::ClientConfig;
pub use content::{Content, ContentKind, ContentType, ContentTypes, Review};
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{ContentFilter, Params, PlaceFilter, Selector};
pub use transport::Transport;
pub use types::{Category, Location, Page, Place, PlaceUpdate, Range, Record};

//! Content records and the content-type tags that discriminate them.
//!
//! # Design
//! A content response is one JSON object holding an array per content type,
//! e.g. `{"news": [...], "photos": [...]}`. Every item shares a common set of
//! fields; the per-type extras live in `ContentKind`. `ContentType::ALL` is
//! the dispatch table: its order is the order in which arrays are flattened.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Record;

/// Wire tag of a single content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    News,
    Photos,
    UserReviews,
    CriticReviews,
    StatusUpdates,
    Events,
    RealEstate,
}

impl ContentType {
    pub const ALL: [ContentType; 7] = [
        ContentType::News,
        ContentType::Photos,
        ContentType::UserReviews,
        ContentType::CriticReviews,
        ContentType::StatusUpdates,
        ContentType::Events,
        ContentType::RealEstate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::Photos => "photos",
            ContentType::UserReviews => "user_reviews",
            ContentType::CriticReviews => "critic_reviews",
            ContentType::StatusUpdates => "status_updates",
            ContentType::Events => "events",
            ContentType::RealEstate => "real_estate",
        }
    }

    /// Names of the fields this type carries on top of the common ones.
    pub fn extra_fields(self) -> &'static [&'static str] {
        match self {
            ContentType::Photos => &["thumbnail"],
            ContentType::UserReviews | ContentType::CriticReviews => &["rating"],
            ContentType::Events => &["local_start_time", "local_end_time"],
            ContentType::RealEstate => &[
                "location",
                "price",
                "number_of_beds",
                "number_of_baths",
                "square_feet",
                "property_type",
            ],
            ContentType::News | ContentType::StatusUpdates => &[],
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content type `{0}`")]
pub struct UnknownContentType(pub String);

/// Which content types a query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypes {
    /// Every type the server knows; wire value `all`.
    All,
    Only(Vec<ContentType>),
}

impl ContentTypes {
    pub fn to_param(&self) -> String {
        match self {
            ContentTypes::All => "all".to_string(),
            ContentTypes::Only(types) => types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<ContentType> for ContentTypes {
    fn from(t: ContentType) -> Self {
        ContentTypes::Only(vec![t])
    }
}

impl From<Vec<ContentType>> for ContentTypes {
    fn from(types: Vec<ContentType>) -> Self {
        ContentTypes::Only(types)
    }
}

impl From<&[ContentType]> for ContentTypes {
    fn from(types: &[ContentType]) -> Self {
        ContentTypes::Only(types.to_vec())
    }
}

/// Review score shared by user and critic reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: Option<f64>,
}

/// Per-type payload of a content item.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    News,
    Photo {
        thumbnail: Option<String>,
    },
    UserReview(Review),
    CriticReview(Review),
    StatusUpdate,
    Event {
        local_start_time: Option<String>,
        local_end_time: Option<String>,
    },
    RealEstate {
        location: Option<String>,
        price: Option<f64>,
        number_of_beds: Option<f64>,
        number_of_baths: Option<f64>,
        square_feet: Option<f64>,
        property_type: Option<String>,
    },
}

impl ContentKind {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentKind::News => ContentType::News,
            ContentKind::Photo { .. } => ContentType::Photos,
            ContentKind::UserReview(_) => ContentType::UserReviews,
            ContentKind::CriticReview(_) => ContentType::CriticReviews,
            ContentKind::StatusUpdate => ContentType::StatusUpdates,
            ContentKind::Event { .. } => ContentType::Events,
            ContentKind::RealEstate { .. } => ContentType::RealEstate,
        }
    }

    /// Values of the per-type fields, positionally matching
    /// `ContentType::extra_fields` for `self.content_type()`.
    fn extra_values(&self) -> Vec<Value> {
        match self {
            ContentKind::News | ContentKind::StatusUpdate => Vec::new(),
            ContentKind::Photo { thumbnail } => vec![thumbnail.clone().into()],
            ContentKind::UserReview(review) | ContentKind::CriticReview(review) => {
                vec![review.rating.into()]
            }
            ContentKind::Event {
                local_start_time,
                local_end_time,
            } => vec![local_start_time.clone().into(), local_end_time.clone().into()],
            ContentKind::RealEstate {
                location,
                price,
                number_of_beds,
                number_of_baths,
                square_feet,
                property_type,
            } => vec![
                location.clone().into(),
                (*price).into(),
                (*number_of_beds).into(),
                (*number_of_baths).into(),
                (*square_feet).into(),
                property_type.clone().into(),
            ],
        }
    }
}

/// A single content item returned by `/content.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub uuid: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub image: Option<String>,
    #[serde(skip)]
    pub kind: ContentKind,
}

impl Record for Content {
    fn to_map(&self) -> Map<String, Value> {
        let mut map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let names = self.kind.content_type().extra_fields();
        for (key, value) in names.iter().zip(self.kind.extra_values()) {
            map.insert(key.to_string(), value);
        }
        map
    }
}

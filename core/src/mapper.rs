//! Mapping from raw JSON objects to typed records.
//!
//! The server is loose about scalar types: ids and postal codes arrive as
//! either strings or numbers, coordinates occasionally as numeric strings.
//! The `*_string` / `*_f64` readers accept both shapes. Required keys that are
//! absent fail with `Error::MissingField`; optional keys fall back to `None`.

use serde_json::Value;

use crate::content::{Content, ContentKind, ContentType, Review};
use crate::error::{Error, Result};
use crate::types::{Category, Location, Place};

fn required<'a>(raw: &'a Value, key: &str) -> Result<&'a Value> {
    raw.get(key).ok_or_else(|| Error::MissingField(key.to_string()))
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn opt_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(as_string)
}

fn opt_f64(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(as_f64)
}

fn required_string(raw: &Value, key: &str) -> Result<String> {
    as_string(required(raw, key)?).ok_or_else(|| Error::InvalidField {
        field: key.to_string(),
        expected: "string",
    })
}

/// Present key whose value may be `null`.
fn required_nullable_string(raw: &Value, key: &str) -> Result<Option<String>> {
    Ok(as_string(required(raw, key)?))
}

fn required_f64(raw: &Value, key: &str) -> Result<f64> {
    as_f64(required(raw, key)?).ok_or_else(|| Error::InvalidField {
        field: key.to_string(),
        expected: "number",
    })
}

/// Build a `Location` from whichever location keys `raw` carries.
///
/// Places without a country still get a location; its `country` is empty.
fn location_from_keys(raw: &Value) -> Location {
    let mut location = Location::new(opt_string(raw, "country").unwrap_or_default());
    location.province = opt_string(raw, "province");
    location.city = opt_string(raw, "city");
    location.locality = opt_string(raw, "locality");
    location.postal_code = opt_string(raw, "postal_code");
    location.address = opt_string(raw, "address");
    location
}

/// Parse the body of `/location.json`.
pub fn parse_location(raw: &Value) -> Result<Location> {
    let country = required_string(raw, "country")?;
    Ok(Location {
        country,
        ..location_from_keys(raw)
    })
}

fn parse_category(raw: &Value) -> Result<Category> {
    Ok(Category {
        category_id: required_string(raw, "category_id")?,
        name: required_string(raw, "name")?,
        parent_id: opt_string(raw, "parent_id"),
    })
}

/// Flatten a category tree in pre-order.
///
/// Every node carrying a `category_id` becomes one entry, parent before its
/// children, siblings in array order. Nodes without an id (such as the root
/// wrapper object) contribute only their children.
pub fn parse_categories(raw: &Value) -> Result<Vec<Category>> {
    let mut out = Vec::new();
    collect_categories(raw, &mut out)?;
    Ok(out)
}

fn collect_categories(node: &Value, out: &mut Vec<Category>) -> Result<()> {
    if node.get("category_id").is_some() {
        out.push(parse_category(node)?);
    }
    if let Some(children) = node.get("categories").and_then(Value::as_array) {
        for child in children {
            collect_categories(child, out)?;
        }
    }
    Ok(())
}

/// Parse a single place object.
pub fn parse_place(raw: &Value) -> Result<Place> {
    let phone_number = required_nullable_string(raw, "phone_number")?;
    let uuid = required_string(raw, "uuid")?;
    let name = required_string(raw, "name")?;
    let link = required_nullable_string(raw, "link")?;
    let latitude = required_f64(raw, "lat")?;
    let longitude = required_f64(raw, "lng")?;
    let categories = required(raw, "categories")?
        .as_array()
        .ok_or_else(|| Error::InvalidField {
            field: "categories".to_string(),
            expected: "array",
        })?
        .iter()
        .map(parse_category)
        .collect::<Result<Vec<_>>>()?;

    Ok(Place {
        uuid,
        name,
        latitude,
        longitude,
        phone_number,
        location: location_from_keys(raw),
        link,
        categories,
        facebook_id: opt_string(raw, "facebook_id"),
        twitter_id: opt_string(raw, "twitter_id"),
    })
}

/// Parse the `places` array of a listing response.
pub fn parse_places(raw: &Value) -> Result<Vec<Place>> {
    required(raw, "places")?
        .as_array()
        .ok_or_else(|| Error::InvalidField {
            field: "places".to_string(),
            expected: "array",
        })?
        .iter()
        .map(parse_place)
        .collect()
}

fn content_kind(raw: &Value, content_type: ContentType) -> ContentKind {
    match content_type {
        ContentType::News => ContentKind::News,
        ContentType::Photos => ContentKind::Photo {
            thumbnail: opt_string(raw, "thumbnail"),
        },
        ContentType::UserReviews => ContentKind::UserReview(Review {
            rating: opt_f64(raw, "rating"),
        }),
        ContentType::CriticReviews => ContentKind::CriticReview(Review {
            rating: opt_f64(raw, "rating"),
        }),
        ContentType::StatusUpdates => ContentKind::StatusUpdate,
        ContentType::Events => ContentKind::Event {
            local_start_time: opt_string(raw, "local_start_time"),
            local_end_time: opt_string(raw, "local_end_time"),
        },
        ContentType::RealEstate => ContentKind::RealEstate {
            location: opt_string(raw, "location"),
            price: opt_f64(raw, "price"),
            number_of_beds: opt_f64(raw, "number_of_beds"),
            number_of_baths: opt_f64(raw, "number_of_baths"),
            square_feet: opt_f64(raw, "square_feet"),
            property_type: opt_string(raw, "property_type"),
        },
    }
}

/// Parse one content item of the given type. Every field is optional.
pub fn parse_content(raw: &Value, content_type: ContentType) -> Content {
    Content {
        content_type,
        uuid: opt_string(raw, "uuid"),
        latitude: opt_f64(raw, "lat"),
        longitude: opt_f64(raw, "lng"),
        title: opt_string(raw, "title"),
        body: opt_string(raw, "body"),
        author: opt_string(raw, "author"),
        published_at: opt_string(raw, "published_at"),
        link: opt_string(raw, "link"),
        source: opt_string(raw, "source"),
        image: opt_string(raw, "image"),
        kind: content_kind(raw, content_type),
    }
}

/// Flatten every recognized content array of a `/content.json` body.
///
/// Arrays are visited in `ContentType::ALL` order; keys that are not a known
/// content type are ignored.
pub fn parse_content_listing(raw: &Value) -> Vec<Content> {
    ContentType::ALL
        .into_iter()
        .filter_map(|t| raw.get(t.as_str()).and_then(Value::as_array).map(|items| (t, items)))
        .flat_map(|(t, items)| items.iter().map(move |item| parse_content(item, t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place_json() -> Value {
        json!({
            "uuid": "304f36b-70c6-68ac-245f-11c9b17eafdfa",
            "name": "Blue Bottle",
            "link": "http://example.com/blue-bottle",
            "phone_number": "415-555-0100",
            "lat": 37.787462,
            "lng": "-122.399223",
            "country": "US",
            "province": "CA",
            "city": "San Francisco",
            "postal_code": 94105,
            "address": "66 Mint St",
            "categories": [
                {"category_id": "12", "name": "Coffee", "parent_id": "3"},
                {"category_id": 40, "name": "Cafes"}
            ]
        })
    }

    #[test]
    fn place_round_trips_all_fields() {
        let place = parse_place(&place_json()).unwrap();
        assert_eq!(place.uuid, "304f36b-70c6-68ac-245f-11c9b17eafdfa");
        assert_eq!(place.name, "Blue Bottle");
        assert_eq!(place.link.as_deref(), Some("http://example.com/blue-bottle"));
        assert_eq!(place.phone_number.as_deref(), Some("415-555-0100"));
        assert_eq!(place.latitude, 37.787462);
        assert_eq!(place.longitude, -122.399223);
        assert_eq!(place.location.country, "US");
        assert_eq!(place.location.city.as_deref(), Some("San Francisco"));
        assert_eq!(place.location.postal_code.as_deref(), Some("94105"));
        assert_eq!(place.location.locality, None);
        assert_eq!(
            place.categories,
            vec![
                Category {
                    category_id: "12".into(),
                    name: "Coffee".into(),
                    parent_id: Some("3".into()),
                },
                Category::new("40", "Cafes"),
            ]
        );
        assert_eq!(place.facebook_id, None);
    }

    #[test]
    fn place_missing_lat_fails() {
        let mut raw = place_json();
        raw.as_object_mut().unwrap().remove("lat");
        let err = parse_place(&raw).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "lat"), "{err:?}");
    }

    #[test]
    fn place_missing_each_required_key_fails() {
        for key in ["phone_number", "uuid", "name", "link", "lat", "lng", "categories"] {
            let mut raw = place_json();
            raw.as_object_mut().unwrap().remove(key);
            match parse_place(&raw) {
                Err(Error::MissingField(f)) => assert_eq!(f, key),
                other => panic!("{key}: expected MissingField, got {other:?}"),
            }
        }
    }

    #[test]
    fn place_null_phone_is_allowed() {
        let mut raw = place_json();
        raw["phone_number"] = Value::Null;
        assert_eq!(parse_place(&raw).unwrap().phone_number, None);
    }

    #[test]
    fn place_non_numeric_lat_is_invalid() {
        let mut raw = place_json();
        raw["lat"] = json!("north");
        assert!(matches!(parse_place(&raw), Err(Error::InvalidField { .. })));
    }

    #[test]
    fn location_requires_country() {
        let loc = parse_location(&json!({"country": "US", "city": "Oakland"})).unwrap();
        assert_eq!(loc.city.as_deref(), Some("Oakland"));
        assert!(matches!(
            parse_location(&json!({"city": "Oakland"})),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn categories_flatten_in_pre_order() {
        let tree = json!({
            "categories": [
                {"category_id": "1", "name": "Food", "categories": [
                    {"category_id": "2", "name": "Coffee", "parent_id": "1"},
                    {"category_id": "3", "name": "Bakery", "parent_id": "1", "categories": [
                        {"category_id": "4", "name": "Bagels", "parent_id": "3"}
                    ]}
                ]},
                {"category_id": "5", "name": "Nightlife"}
            ]
        });
        let cats = parse_categories(&tree).unwrap();
        let ids: Vec<&str> = cats.iter().map(|c| c.category_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
        assert_eq!(cats[3].parent_id.as_deref(), Some("3"));
        assert_eq!(cats[0].parent_id, None);
    }

    #[test]
    fn categories_root_with_id_is_included() {
        let cats = parse_categories(&json!({"category_id": "0", "name": "Root"})).unwrap();
        assert_eq!(cats.len(), 1);
        assert!(parse_categories(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn content_listing_skips_unknown_tags() {
        let raw = json!({
            "photos": [
                {"uuid": "p1", "title": "Bridge", "thumbnail": "http://img/t1.jpg", "lat": 37.8, "lng": -122.4}
            ],
            "podcasts": [
                {"uuid": "x1", "title": "ignored"}
            ],
            "events": [
                {"uuid": "e1", "local_start_time": "2011-05-01 19:00", "local_end_time": "2011-05-01 23:00"},
                {"uuid": "e2"}
            ]
        });
        let items = parse_content_listing(&raw);
        let uuids: Vec<_> = items.iter().map(|c| c.uuid.as_deref().unwrap()).collect();
        assert_eq!(uuids, ["p1", "e1", "e2"]);
        assert_eq!(
            items[0].kind,
            ContentKind::Photo {
                thumbnail: Some("http://img/t1.jpg".into())
            }
        );
        assert_eq!(items[0].latitude, Some(37.8));
        assert_eq!(
            items[1].kind,
            ContentKind::Event {
                local_start_time: Some("2011-05-01 19:00".into()),
                local_end_time: Some("2011-05-01 23:00".into()),
            }
        );
        assert_eq!(
            items[2].kind,
            ContentKind::Event {
                local_start_time: None,
                local_end_time: None,
            }
        );
    }

    #[test]
    fn content_listing_orders_by_tag_table() {
        let raw = json!({
            "real_estate": [{"uuid": "r1"}],
            "news": [{"uuid": "n1"}, {"uuid": "n2"}]
        });
        let tags: Vec<_> = parse_content_listing(&raw).iter().map(|c| c.content_type).collect();
        assert_eq!(tags, [ContentType::News, ContentType::News, ContentType::RealEstate]);
    }

    #[test]
    fn real_estate_reads_each_field_by_name() {
        let raw = json!({
            "uuid": "r1",
            "title": "2BR condo",
            "location": "SoMa",
            "price": 650000,
            "number_of_beds": 2,
            "number_of_baths": "1.5",
            "square_feet": 980,
            "property_type": "condo"
        });
        let content = parse_content(&raw, ContentType::RealEstate);
        assert_eq!(
            content.kind,
            ContentKind::RealEstate {
                location: Some("SoMa".into()),
                price: Some(650000.0),
                number_of_beds: Some(2.0),
                number_of_baths: Some(1.5),
                square_feet: Some(980.0),
                property_type: Some("condo".into()),
            }
        );
        assert_eq!(content.title.as_deref(), Some("2BR condo"));
    }

    #[test]
    fn reviews_carry_rating() {
        let user = parse_content(&json!({"rating": 4}), ContentType::UserReviews);
        assert_eq!(user.kind, ContentKind::UserReview(Review { rating: Some(4.0) }));
        let critic = parse_content(&json!({}), ContentType::CriticReviews);
        assert_eq!(critic.kind, ContentKind::CriticReview(Review { rating: None }));
    }

    #[test]
    fn every_declared_extra_field_is_read() {
        use crate::types::Record;

        for t in ContentType::ALL {
            let mut raw = serde_json::Map::new();
            for name in t.extra_fields() {
                raw.insert(name.to_string(), json!(7));
            }
            let map = parse_content(&Value::Object(raw), t).to_map();
            for name in t.extra_fields() {
                assert!(map.get(*name).is_some_and(|v| !v.is_null()), "{t}: {name}");
            }
        }
    }

    #[test]
    fn common_fields_default_to_none() {
        let content = parse_content(&json!({}), ContentType::News);
        assert_eq!(content.uuid, None);
        assert_eq!(content.latitude, None);
        assert_eq!(content.published_at, None);
        assert_eq!(content.kind, ContentKind::News);
    }
}

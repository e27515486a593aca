//! Clothing item read and write models

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Categories offered by the item forms
pub const CATEGORIES: [&str; 9] = [
    "Tops",
    "Bottoms",
    "Dresses",
    "Outerwear",
    "Shoes",
    "Accessories",
    "Underwear",
    "Activewear",
    "Other",
];

/// Owner assigned by the server when none is given
pub const DEFAULT_OWNER: &str = "default";

/// Server-assigned item identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

/// A clothing item as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: ItemId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, with = "purchase_date")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_owner")]
    pub owner: String,
}

impl ClothingItem {
    /// Name shown in cards and headings
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unnamed Item")
    }

    /// First image, used as the thumbnail
    pub fn thumbnail(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Price formatted for display, e.g. `$12.50`
    pub fn price_label(&self) -> Option<String> {
        self.purchase_price
            .filter(|p| *p > 0.0)
            .map(|p| format!("${:.2}", p))
    }
}

/// Payload for `POST /api/items/`. Absent fields take the server default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClothingItemCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "purchase_date")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Payload for `PUT /api/items/{id}`.
///
/// The outer `Option` says whether the field is sent at all; the inner one
/// distinguishes a new value from an explicit `null` that clears the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClothingItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "purchase_date::patch")]
    pub purchase_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl ClothingItemUpdate {
    /// Apply the provided fields to `item`, leaving the rest untouched.
    pub fn apply_to(&self, item: &mut ClothingItem) {
        fn patch<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        patch(&mut item.name, &self.name);
        patch(&mut item.description, &self.description);
        patch(&mut item.category, &self.category);
        patch(&mut item.subcategory, &self.subcategory);
        patch(&mut item.brand, &self.brand);
        patch(&mut item.purchase_date, &self.purchase_date);
        patch(&mut item.purchase_price, &self.purchase_price);
        patch(&mut item.tags, &self.tags);
        patch(&mut item.image_urls, &self.image_urls);
        patch(&mut item.notes, &self.notes);
        patch(&mut item.owner, &self.owner);
    }
}

/// Existing URLs first, newly uploaded ones appended in upload order.
pub fn merge_image_urls(existing: &[String], uploaded: &[String]) -> Vec<String> {
    existing.iter().chain(uploaded).cloned().collect()
}

/// Purchase dates travel as midnight date-times and read back from either form.
mod purchase_date {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const WIRE_FORMAT: &str = "%Y-%m-%dT00:00:00";

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date()))
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
    }

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&date.format(WIRE_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid purchase date: {raw}"))),
        }
    }

    pub mod patch {
        use chrono::NaiveDate;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            value: &Option<Option<NaiveDate>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(inner) => super::serialize(inner, s),
                None => s.serialize_none(),
            }
        }
    }
}

/// Timestamps may come with or without an offset; naive values are UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.and_utc()))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw {
                None => Ok(None),
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp: {raw}"))
                }),
            }
        }
    }
}

pub(crate) use purchase_date::parse as parse_purchase_date;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_server_json() {
        let json = r#"{
            "id": 7,
            "name": "Blue Shirt",
            "description": null,
            "category": "Tops",
            "subcategory": null,
            "brand": "Uniqlo",
            "purchase_date": "2024-03-02T00:00:00",
            "purchase_price": 19.9,
            "tags": ["summer", "casual"],
            "notes": null,
            "image_urls": ["/uploads/a.jpg", "/uploads/b.jpg"],
            "created_at": "2024-03-05T10:15:00.123456+00:00",
            "updated_at": null,
            "owner": "default"
        }"#;

        let item: ClothingItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, ItemId(7));
        assert_eq!(item.display_name(), "Blue Shirt");
        assert_eq!(item.purchase_date, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(item.thumbnail(), Some("/uploads/a.jpg"));
        assert_eq!(item.price_label().as_deref(), Some("$19.90"));
        assert!(item.updated_at.is_none());
    }

    #[test]
    fn test_item_minimal_json() {
        let json = r#"{"id": 1, "created_at": "2024-01-01T08:00:00"}"#;
        let item: ClothingItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.display_name(), "Unnamed Item");
        assert!(item.tags.is_empty());
        assert!(item.image_urls.is_empty());
        assert_eq!(item.owner, DEFAULT_OWNER);
        assert!(item.thumbnail().is_none());
    }

    #[test]
    fn test_purchase_date_accepts_bare_date() {
        assert_eq!(
            parse_purchase_date("2023-12-24"),
            NaiveDate::from_ymd_opt(2023, 12, 24)
        );
        assert_eq!(
            parse_purchase_date("2023-12-24T00:00:00+00:00"),
            NaiveDate::from_ymd_opt(2023, 12, 24)
        );
        assert!(parse_purchase_date("24/12/2023").is_none());
    }

    #[test]
    fn test_create_omits_unset_fields() {
        let create = ClothingItemCreate {
            name: Some("Blue Shirt".into()),
            category: Some("Tops".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&create).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["name"], "Blue Shirt");
        assert_eq!(obj["tags"], serde_json::json!([]));
        assert_eq!(obj["image_urls"], serde_json::json!([]));
        assert!(!obj.contains_key("brand"));
        assert!(!obj.contains_key("owner"));
    }

    #[test]
    fn test_update_distinguishes_clear_from_unchanged() {
        let update = ClothingItemUpdate {
            brand: Some(None),
            name: Some(Some("Renamed".into())),
            purchase_date: Some(NaiveDate::from_ymd_opt(2024, 5, 1)),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj["brand"].is_null());
        assert_eq!(obj["name"], "Renamed");
        assert_eq!(obj["purchase_date"], "2024-05-01T00:00:00");
        assert!(!obj.contains_key("category"));
        assert!(!obj.contains_key("image_urls"));
    }

    #[test]
    fn test_update_apply_to_is_partial() {
        let mut item: ClothingItem =
            serde_json::from_str(r#"{"id": 3, "name": "Coat", "brand": "Acme", "created_at": "2024-01-01T00:00:00Z"}"#)
                .unwrap();
        let update = ClothingItemUpdate {
            brand: Some(None),
            tags: Some(vec!["winter".into()]),
            ..Default::default()
        };
        update.apply_to(&mut item);
        assert_eq!(item.name.as_deref(), Some("Coat"));
        assert!(item.brand.is_none());
        assert_eq!(item.tags, vec!["winter".to_string()]);
    }

    #[test]
    fn test_merge_image_urls_appends() {
        let existing = vec!["/uploads/1.jpg".to_string(), "/uploads/2.jpg".to_string()];
        let uploaded = vec!["/uploads/3.jpg".to_string()];
        assert_eq!(
            merge_image_urls(&existing, &uploaded),
            vec!["/uploads/1.jpg", "/uploads/2.jpg", "/uploads/3.jpg"]
        );
        assert_eq!(merge_image_urls(&[], &uploaded), uploaded);
    }
}

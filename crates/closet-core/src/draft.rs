//! Form draft for creating and editing items
//!
//! The draft keeps every editable field as the text the user typed. Edits go
//! through [`DraftAction`] so the forms never dispatch on field names.
//! Conversion into a write model parses price and date and reports
//! [`InputError`] before anything is sent.

use chrono::NaiveDate;

use crate::error::InputError;
use crate::item::{parse_purchase_date, ClothingItem, ClothingItemCreate, ClothingItemUpdate};
use crate::tags::TagSet;

/// Free-text fields of the item forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Description,
    Category,
    Subcategory,
    Brand,
    PurchaseDate,
    PurchasePrice,
    Notes,
}

/// A single edit applied to a draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftAction {
    Set(DraftField, String),
    AddTag(String),
    RemoveTag(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    pub purchase_date: String,
    pub purchase_price: String,
    pub notes: String,
    pub tags: TagSet,
}

impl ItemDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from a stored item (edit form)
    pub fn from_item(item: &ClothingItem) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: text(&item.name),
            description: text(&item.description),
            category: text(&item.category),
            subcategory: text(&item.subcategory),
            brand: text(&item.brand),
            purchase_date: item
                .purchase_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            // Exact text so an untouched price is sent back unchanged
            purchase_price: item.purchase_price.map(|p| p.to_string()).unwrap_or_default(),
            notes: text(&item.notes),
            tags: item.tags.iter().collect(),
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Description => &self.description,
            DraftField::Category => &self.category,
            DraftField::Subcategory => &self.subcategory,
            DraftField::Brand => &self.brand,
            DraftField::PurchaseDate => &self.purchase_date,
            DraftField::PurchasePrice => &self.purchase_price,
            DraftField::Notes => &self.notes,
        }
    }

    /// Apply an edit. Returns whether the draft changed.
    pub fn apply(&mut self, action: DraftAction) -> bool {
        match action {
            DraftAction::Set(field, value) => {
                let slot = match field {
                    DraftField::Name => &mut self.name,
                    DraftField::Description => &mut self.description,
                    DraftField::Category => &mut self.category,
                    DraftField::Subcategory => &mut self.subcategory,
                    DraftField::Brand => &mut self.brand,
                    DraftField::PurchaseDate => &mut self.purchase_date,
                    DraftField::PurchasePrice => &mut self.purchase_price,
                    DraftField::Notes => &mut self.notes,
                };
                if *slot == value {
                    return false;
                }
                *slot = value;
                true
            }
            DraftAction::AddTag(tag) => self.tags.add(&tag),
            DraftAction::RemoveTag(tag) => self.tags.remove(&tag),
        }
    }

    pub fn parsed_price(&self) -> Result<Option<f64>, InputError> {
        let raw = self.purchase_price.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let price: f64 = raw
            .trim_start_matches('$')
            .parse()
            .map_err(|_| InputError::InvalidPrice(raw.to_string()))?;
        if !price.is_finite() {
            return Err(InputError::InvalidPrice(raw.to_string()));
        }
        if price < 0.0 {
            return Err(InputError::NegativePrice);
        }
        Ok(Some(price))
    }

    pub fn parsed_date(&self) -> Result<Option<NaiveDate>, InputError> {
        let raw = self.purchase_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_purchase_date(raw)
            .map(Some)
            .ok_or_else(|| InputError::InvalidDate(raw.to_string()))
    }

    /// Check everything that would make a submission fail locally
    pub fn validate(&self) -> Result<(), InputError> {
        self.parsed_price()?;
        self.parsed_date()?;
        Ok(())
    }

    /// Payload for a new item. Blank fields are left to the server default;
    /// images are filled in after the upload step.
    pub fn to_create(&self, owner: Option<&str>) -> Result<ClothingItemCreate, InputError> {
        Ok(ClothingItemCreate {
            name: non_blank(&self.name),
            description: non_blank(&self.description),
            category: non_blank(&self.category),
            subcategory: non_blank(&self.subcategory),
            brand: non_blank(&self.brand),
            purchase_date: self.parsed_date()?,
            purchase_price: self.parsed_price()?,
            tags: self.tags.to_vec(),
            image_urls: Vec::new(),
            notes: non_blank(&self.notes),
            owner: owner.and_then(non_blank),
        })
    }

    /// Changes for an existing item. Every editable field is sent; a blank
    /// field clears the stored value. Images are filled in after upload.
    pub fn to_update(&self) -> Result<ClothingItemUpdate, InputError> {
        Ok(ClothingItemUpdate {
            name: Some(non_blank(&self.name)),
            description: Some(non_blank(&self.description)),
            category: Some(non_blank(&self.category)),
            subcategory: Some(non_blank(&self.subcategory)),
            brand: Some(non_blank(&self.brand)),
            purchase_date: Some(self.parsed_date()?),
            purchase_price: Some(self.parsed_price()?),
            tags: Some(self.tags.to_vec()),
            image_urls: None,
            notes: Some(non_blank(&self.notes)),
            owner: None,
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

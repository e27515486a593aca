//! List query parameters and the filter/sort contract shared by the pages

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column the list endpoint sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    CreatedAt,
    Name,
    Category,
    PurchaseDate,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::CreatedAt,
        SortBy::Name,
        SortBy::Category,
        SortBy::PurchaseDate,
    ];

    /// Label shown in the sort menu
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreatedAt => "Date Added",
            Self::Name => "Name",
            Self::Category => "Category",
            Self::PurchaseDate => "Purchase Date",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Name => "name",
            Self::Category => "category",
            Self::PurchaseDate => "purchase_date",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Asc => "Ascending",
            Self::Desc => "Descending",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for `GET /api/items/`.
///
/// `None` fields are left out of the query string entirely, so the server
/// applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemsFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Page size the browse view starts with and resets to
pub const LIST_PAGE_SIZE: u32 = 50;

/// Number of recent items on the dashboard
pub const DASHBOARD_RECENT: u32 = 6;

impl ItemsFilters {
    /// Newest first, `limit` items
    pub fn newest(limit: u32) -> Self {
        Self {
            sort_by: Some(SortBy::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Starting point of the browse view, and what "Clear Filters" resets to
    pub fn list_default() -> Self {
        Self::newest(LIST_PAGE_SIZE)
    }

    /// Recent items summary on the dashboard
    pub fn dashboard() -> Self {
        Self::newest(DASHBOARD_RECENT)
    }

    /// Merge one field change into the current set
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Category(v) => self.category = non_blank(v),
            FilterChange::Subcategory(v) => self.subcategory = non_blank(v),
            FilterChange::Brand(v) => self.brand = non_blank(v),
            FilterChange::Owner(v) => self.owner = non_blank(v),
            FilterChange::SortBy(v) => self.sort_by = v,
            FilterChange::SortOrder(v) => self.sort_order = v,
            FilterChange::Limit(v) => self.limit = v,
            FilterChange::Skip(v) => self.skip = v,
        }
    }

    /// Copy with the free-text search merged in; a blank term is omitted.
    pub fn with_search(&self, term: &str) -> Self {
        Self {
            search: non_blank(Some(term.to_string())),
            ..self.clone()
        }
    }

    /// Sort column with the server default filled in
    pub fn effective_sort_by(&self) -> SortBy {
        self.sort_by.unwrap_or_default()
    }

    /// Sort order with the server default filled in
    pub fn effective_sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }

    /// Defined fields as `(name, value)` pairs, in declaration order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value {
                pairs.push((key, v));
            }
        };
        push("category", self.category.clone());
        push("subcategory", self.subcategory.clone());
        push("brand", self.brand.clone());
        push("search", self.search.clone());
        push("sort_by", self.sort_by.map(|s| s.as_str().to_string()));
        push("sort_order", self.sort_order.map(|s| s.as_str().to_string()));
        push("owner", self.owner.clone());
        push("skip", self.skip.map(|s| s.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));
        pairs
    }

    /// Stable text form used as the cache key parameter
    pub fn cache_key(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A single filter edit coming from the browse view.
///
/// Text fields treat an empty or whitespace-only value as "cleared".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Category(Option<String>),
    Subcategory(Option<String>),
    Brand(Option<String>),
    Owner(Option<String>),
    SortBy(Option<SortBy>),
    SortOrder(Option<SortOrder>),
    Limit(Option<u32>),
    Skip(Option<u32>),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, ImageName};

/// Catalog category. Never hard-deleted; `status == false` marks it removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub status: bool,
    pub image: Option<ImageName>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub status: bool,
    pub image: Option<ImageName>,
    pub created_at: NaiveDateTime,
}

/// Changes applied by a category update.
///
/// `image` is only overwritten when a new one was ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChanges {
    pub name: CategoryName,
    pub status: bool,
    pub image: Option<ImageName>,
    pub updated_at: NaiveDateTime,
}

/// Result of a cascading soft-delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDeactivation {
    pub category_id: CategoryId,
    /// Number of products switched to inactive together with the category.
    pub deactivated_products: usize,
}

/// Sort orders accepted by the category listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySort {
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
}

impl CategorySort {
    /// Parses a sort key, returning `None` for unrecognised keys.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "sortid_asc" => Some(Self::IdAsc),
            "sortid_desc" => Some(Self::IdDesc),
            "sortname_asc" => Some(Self::NameAsc),
            "sortname_desc" => Some(Self::NameDesc),
            _ => None,
        }
    }

    /// Stable in-place sort of `categories`.
    pub fn apply(self, categories: &mut [Category]) {
        match self {
            Self::IdAsc => categories.sort_by_key(|c| c.id),
            Self::IdDesc => categories.sort_by(|a, b| b.id.cmp(&a.id)),
            Self::NameAsc => categories.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str())),
            Self::NameDesc => categories.sort_by(|a, b| b.name.as_str().cmp(a.name.as_str())),
        }
    }
}

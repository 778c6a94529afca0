use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, ImageName, ProductAddress, ProductDescription, ProductId, ProductName,
    ProductPrice, ProductQuantity,
};

/// A catalog product belonging to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: ProductName,
    pub price: ProductPrice,
    pub quantity: ProductQuantity,
    pub address: Option<ProductAddress>,
    pub description: Option<ProductDescription>,
    pub image: Option<ImageName>,
    pub status: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub price: ProductPrice,
    pub quantity: ProductQuantity,
    pub address: Option<ProductAddress>,
    pub description: Option<ProductDescription>,
    pub image: Option<ImageName>,
    pub status: bool,
    pub created_at: NaiveDateTime,
}

/// Changes applied by a product update. `image: None` keeps the stored image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub price: ProductPrice,
    pub quantity: ProductQuantity,
    pub address: Option<ProductAddress>,
    pub description: Option<ProductDescription>,
    pub image: Option<ImageName>,
    pub status: bool,
    pub updated_at: NaiveDateTime,
}

/// Sort orders accepted by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Parses a sort key, returning `None` for unrecognised keys.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "sortid_asc" => Some(Self::IdAsc),
            "sortid_desc" => Some(Self::IdDesc),
            "sortname_asc" => Some(Self::NameAsc),
            "sortname_desc" => Some(Self::NameDesc),
            "sortprice_asc" => Some(Self::PriceAsc),
            "sortprice_desc" => Some(Self::PriceDesc),
            _ => None,
        }
    }

    /// Stable in-place sort of `products`.
    pub fn apply(self, products: &mut [Product]) {
        match self {
            Self::IdAsc => products.sort_by_key(|p| p.id),
            Self::IdDesc => products.sort_by(|a, b| b.id.cmp(&a.id)),
            Self::NameAsc => products.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str())),
            Self::NameDesc => products.sort_by(|a, b| b.name.as_str().cmp(a.name.as_str())),
            Self::PriceAsc => products.sort_by(|a, b| a.price.get().total_cmp(&b.price.get())),
            Self::PriceDesc => products.sort_by(|a, b| b.price.get().total_cmp(&a.price.get())),
        }
    }
}

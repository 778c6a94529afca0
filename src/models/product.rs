use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct,
    ProductChanges as DomainProductChanges,
};
use crate::domain::types::{
    ImageName, ProductAddress, ProductDescription, ProductName, ProductPrice, ProductQuantity,
    TypeConstraintError, fold_case,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::products)]
#[diesel(belongs_to(crate::models::category::Category))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub address: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub category_id: i32,
    pub name: String,
    pub name_folded: String,
    pub price: f64,
    pub quantity: i32,
    pub address: Option<String>,
    pub address_folded: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: bool,
    pub created_at: NaiveDateTime,
}

/// Patch applied on update.
///
/// Address and description are always written so they can be cleared;
/// the image is only written when a new one was stored.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChangeset {
    pub category_id: i32,
    pub name: String,
    pub name_folded: String,
    pub price: f64,
    pub quantity: i32,
    pub address: Option<String>,
    pub address_folded: Option<String>,
    pub description: Option<String>,
    pub status: bool,
    pub updated_at: Option<NaiveDateTime>,
}

/// Image patch kept apart from [`ProductChangeset`] because it must not null
/// the column when absent.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductImageChangeset {
    pub image: String,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            category_id: product.category_id.try_into()?,
            name: ProductName::new(product.name)?,
            price: ProductPrice::new(product.price)?,
            quantity: ProductQuantity::new(product.quantity)?,
            address: product.address.map(ProductAddress::new).transpose()?,
            description: product.description.map(ProductDescription::new).transpose()?,
            image: product.image.map(ImageName::new).transpose()?,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            category_id: product.category_id.get(),
            name_folded: fold_case(product.name.as_str()),
            name: product.name.into_inner(),
            price: product.price.get(),
            quantity: product.quantity.get(),
            address_folded: product.address.as_ref().map(|a| fold_case(a.as_str())),
            address: product.address.map(ProductAddress::into_inner),
            description: product.description.map(ProductDescription::into_inner),
            image: product.image.map(ImageName::into_inner),
            status: product.status,
            created_at: product.created_at,
        }
    }
}

impl ProductChangeset {
    /// Splits domain changes into the column patch and an optional image patch.
    pub fn split(changes: DomainProductChanges) -> (Self, Option<ProductImageChangeset>) {
        let image = changes.image.map(|image| ProductImageChangeset {
            image: image.into_inner(),
        });
        let changeset = Self {
            category_id: changes.category_id.get(),
            name_folded: fold_case(changes.name.as_str()),
            name: changes.name.into_inner(),
            price: changes.price.get(),
            quantity: changes.quantity.get(),
            address_folded: changes.address.as_ref().map(|a| fold_case(a.as_str())),
            address: changes.address.map(ProductAddress::into_inner),
            description: changes.description.map(ProductDescription::into_inner),
            status: changes.status,
            updated_at: Some(changes.updated_at),
        };
        (changeset, image)
    }
}

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{
    CategoryId, ProductAddress, ProductDescription, ProductId, ProductName, ProductPrice,
    ProductQuantity,
};
use crate::forms::{FormError, default_status, non_blank};

/// Product create/update payload as submitted by a client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(range(min = 1, message = "product id must be greater than zero"))]
    pub id: Option<i32>,
    #[validate(length(
        min = 1,
        max = 50,
        message = "product name must be between 1 and 50 characters"
    ))]
    pub name: String,
    #[validate(range(min = 0.0, message = "price must be zero or greater"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity must be zero or greater"))]
    pub quantity: i32,
    #[validate(length(max = 255, message = "address must be at most 255 characters"))]
    pub address: Option<String>,
    pub description: Option<String>,
    #[validate(
        required(message = "category id is required"),
        range(min = 1, message = "category id must be greater than zero")
    )]
    pub category_id: Option<i32>,
    #[serde(default = "default_status")]
    pub status: bool,
    /// Base64 image content.
    pub image: Option<String>,
}

/// Attributes shared by create and update payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAttributes {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub price: ProductPrice,
    pub quantity: ProductQuantity,
    pub address: Option<ProductAddress>,
    pub description: Option<ProductDescription>,
    pub status: bool,
    pub image: Option<String>,
}

impl ProductAttributes {
    fn from_form(value: ProductForm) -> Result<Self, FormError> {
        let category_id = value.category_id.ok_or(FormError::Missing("category id"))?;
        Ok(Self {
            category_id: CategoryId::new(category_id)?,
            name: ProductName::new(value.name)?,
            price: ProductPrice::new(value.price)?,
            quantity: ProductQuantity::new(value.quantity)?,
            address: non_blank(value.address)
                .map(ProductAddress::new)
                .transpose()?,
            description: non_blank(value.description)
                .map(ProductDescription::new)
                .transpose()?,
            status: value.status,
            image: non_blank(value.image),
        })
    }
}

/// Validated data for creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductPayload {
    pub attributes: ProductAttributes,
}

impl TryFrom<ProductForm> for NewProductPayload {
    type Error = FormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            attributes: ProductAttributes::from_form(value)?,
        })
    }
}

/// Validated data for updating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductPayload {
    pub id: ProductId,
    pub attributes: ProductAttributes,
}

impl TryFrom<ProductForm> for UpdateProductPayload {
    type Error = FormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let id = value.id.ok_or(FormError::Missing("product id"))?;
        Ok(Self {
            id: ProductId::new(id)?,
            attributes: ProductAttributes::from_form(value)?,
        })
    }
}

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{CategoryId, CategoryName};
use crate::forms::{FormError, default_status, non_blank};

/// Category create/update payload as submitted by a client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    #[validate(range(min = 1, message = "category id must be greater than zero"))]
    pub id: Option<i32>,
    #[validate(length(
        min = 1,
        max = 50,
        message = "category name must be between 1 and 50 characters"
    ))]
    pub name: String,
    #[serde(default = "default_status")]
    pub status: bool,
    /// Base64 image content.
    pub image: Option<String>,
}

/// Validated data for creating a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategoryPayload {
    pub name: CategoryName,
    pub status: bool,
    pub image: Option<String>,
}

impl TryFrom<CategoryForm> for NewCategoryPayload {
    type Error = FormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
            status: value.status,
            image: non_blank(value.image),
        })
    }
}

/// Validated data for updating a category.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryPayload {
    pub id: CategoryId,
    pub name: CategoryName,
    pub status: bool,
    pub image: Option<String>,
}

impl TryFrom<CategoryForm> for UpdateCategoryPayload {
    type Error = FormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let id = value.id.ok_or(FormError::Missing("category id"))?;
        Ok(Self {
            id: CategoryId::new(id)?,
            name: CategoryName::new(value.name)?,
            status: value.status,
            image: non_blank(value.image),
        })
    }
}

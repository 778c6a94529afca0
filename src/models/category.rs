use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, CategoryChanges as DomainCategoryChanges,
    NewCategory as DomainNewCategory,
};
use crate::domain::types::{CategoryName, ImageName, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub status: bool,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub name_folded: String,
    pub status: bool,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Patch applied on update. A `None` image leaves the column untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChangeset {
    pub name: String,
    pub name_folded: String,
    pub status: bool,
    pub image: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            status: category.status,
            image: category.image.map(ImageName::new).transpose()?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            name_folded: category.name.folded(),
            name: category.name.into_inner(),
            status: category.status,
            image: category.image.map(ImageName::into_inner),
            created_at: category.created_at,
        }
    }
}

impl From<DomainCategoryChanges> for CategoryChangeset {
    fn from(changes: DomainCategoryChanges) -> Self {
        Self {
            name_folded: changes.name.folded(),
            name: changes.name.into_inner(),
            status: changes.status,
            image: changes.image.map(ImageName::into_inner),
            updated_at: Some(changes.updated_at),
        }
    }
}

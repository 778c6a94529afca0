use chrono::Utc;

use crate::domain::category::{
    Category, CategoryChanges, CategoryDeactivation, CategorySort, NewCategory,
};
use crate::domain::pagination::PageRequest;
use crate::domain::types::CategoryId;
use crate::forms::categories::{CategoryForm, NewCategoryPayload, UpdateCategoryPayload};
use crate::images::{ImageStore, ImageTarget};
use crate::repository::{CategoryFilter, CategoryReader, CategoryWriter, RepositoryError};

use super::{ServiceError, ServiceResult, discard_image, require_id};

/// Lists every category in store order, paginated in memory.
pub fn list_categories<R>(page: PageRequest, repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    match repo.list_categories(CategoryFilter::default()) {
        Ok(categories) => Ok(page.apply(categories)),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_category<R>(category_id: Option<i32>, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    let category_id = require_id(category_id, CategoryId::new, || {
        ServiceError::NotFound("category not found".to_string())
    })?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound(format!(
            "category {category_id} not found"
        ))),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Searches categories by case-insensitive name fragment and exact status.
pub fn search_categories<R>(
    page: PageRequest,
    name: Option<&str>,
    status: bool,
    repo: &R,
) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    let mut filter = CategoryFilter::default().status(status);
    if let Some(name) = name {
        filter = filter.name_contains(name);
    }

    match repo.list_categories(filter) {
        Ok(categories) => Ok(page.apply(categories)),
        Err(e) => {
            log::error!("Failed to search categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Creates a category after validation and a case-insensitive duplicate check.
///
/// The unique index on the store closes the window between the check and the
/// insert; a violation there is reported the same way as the early check.
pub fn create_category<R>(
    form: CategoryForm,
    repo: &R,
    images: &ImageStore,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let payload = NewCategoryPayload::try_from(form)?;

    match repo.find_category_by_name(&payload.name) {
        Ok(Some(_)) => return Err(duplicate_name(&payload.name)),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check category name: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let image = payload
        .image
        .as_deref()
        .map(|image| images.ingest(image, ImageTarget::Category))
        .transpose()?;

    let category = NewCategory {
        name: payload.name,
        status: payload.status,
        image,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_category(&category) {
        Ok(created) => {
            log::info!("Created category {} ({})", created.id, created.name);
            Ok(created)
        }
        Err(RepositoryError::UniqueViolation(_)) => {
            discard_image(images, category.image.as_ref());
            Err(duplicate_name(&category.name))
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            discard_image(images, category.image.as_ref());
            Err(ServiceError::Internal)
        }
    }
}

/// Overwrites name and status, replacing the image only when one is supplied.
pub fn update_category<R>(
    form: CategoryForm,
    repo: &R,
    images: &ImageStore,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let payload = UpdateCategoryPayload::try_from(form)?;

    match repo.get_category_by_id(payload.id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(category_not_found(payload.id)),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.find_category_by_name(&payload.name) {
        Ok(Some(other)) if other.id != payload.id => return Err(duplicate_name(&payload.name)),
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to check category name: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let image = payload
        .image
        .as_deref()
        .map(|image| images.ingest(image, ImageTarget::Category))
        .transpose()?;

    let changes = CategoryChanges {
        name: payload.name,
        status: payload.status,
        image,
        updated_at: Utc::now().naive_utc(),
    };

    match repo.update_category(payload.id, &changes) {
        Ok(0) => {
            discard_image(images, changes.image.as_ref());
            return Err(category_not_found(payload.id));
        }
        Ok(_) => log::info!("Updated category {}", payload.id),
        Err(RepositoryError::UniqueViolation(_)) => {
            discard_image(images, changes.image.as_ref());
            return Err(duplicate_name(&changes.name));
        }
        Err(e) => {
            log::error!("Failed to update category: {e}");
            discard_image(images, changes.image.as_ref());
            return Err(ServiceError::Internal);
        }
    }

    match repo.get_category_by_id(payload.id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(category_not_found(payload.id)),
        Err(e) => {
            log::error!("Failed to reload category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Soft-deletes a category and all of its products.
///
/// Both writes share one store transaction, so a failure leaves neither the
/// category nor its products changed. Deleting an inactive category succeeds.
pub fn delete_category<R>(
    category_id: Option<i32>,
    repo: &R,
) -> ServiceResult<CategoryDeactivation>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = require_id(category_id, CategoryId::new, || {
        ServiceError::BadRequest("category id is required".to_string())
    })?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(ServiceError::BadRequest(format!(
                "category {category_id} does not exist"
            )));
        }
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.deactivate_category(category_id) {
        Ok(outcome) => {
            log::info!(
                "Deactivated category {category_id} and {} product(s)",
                outcome.deactivated_products
            );
            Ok(outcome)
        }
        Err(e) => {
            log::error!("Failed to delete category {category_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Returns all categories ordered by `key`; unknown keys keep store order.
pub fn sort_categories<R>(key: &str, repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    let mut categories = match repo.list_categories(CategoryFilter::default()) {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if let Some(sort) = CategorySort::parse(key) {
        sort.apply(&mut categories);
    }

    Ok(categories)
}

fn duplicate_name(name: &impl std::fmt::Display) -> ServiceError {
    ServiceError::Conflict(format!("category '{name}' already exists"))
}

fn category_not_found(id: CategoryId) -> ServiceError {
    ServiceError::NotFound(format!("category {id} not found"))
}

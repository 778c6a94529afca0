use chrono::Utc;
use serde::Deserialize;

use crate::domain::pagination::PageRequest;
use crate::domain::product::{NewProduct, Product, ProductChanges, ProductSort};
use crate::domain::types::{CategoryId, ProductId};
use crate::forms::products::{NewProductPayload, ProductForm, UpdateProductPayload};
use crate::images::{ImageStore, ImageTarget};
use crate::repository::{
    CategoryReader, ProductFilter, ProductOrder, ProductReader, ProductWriter, RepositoryError,
};

use super::{ServiceError, ServiceResult, discard_image, require_id};

/// Search criteria for [`search_products`]. Absent fields do not filter.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearch {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub address: Option<String>,
    #[serde(default = "crate::forms::default_status")]
    pub status: bool,
    pub category_id: Option<i32>,
}

impl Default for ProductSearch {
    fn default() -> Self {
        Self {
            name: None,
            quantity: None,
            price_min: None,
            price_max: None,
            address: None,
            status: true,
            category_id: None,
        }
    }
}

impl ProductSearch {
    /// Builds the store predicate, or `None` when nothing can match.
    fn into_filter(self) -> Option<ProductFilter> {
        let mut filter = ProductFilter::default()
            .price_between(self.price_min, self.price_max)
            .status(self.status);
        if let Some(name) = self.name {
            filter = filter.name_contains(name);
        }
        if let Some(quantity) = self.quantity {
            filter = filter.quantity(quantity);
        }
        if let Some(address) = self.address {
            filter = filter.address_contains(address);
        }
        if let Some(category_id) = self.category_id {
            filter = filter.category(CategoryId::new(category_id).ok()?);
        }
        Some(filter)
    }
}

fn load_products<R>(filter: ProductFilter, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    repo.list_products(filter).map_err(|e| {
        log::error!("Failed to list products: {e}");
        ServiceError::Internal
    })
}

/// Lists every product regardless of status, paginated in memory.
pub fn list_products<R>(page: PageRequest, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    load_products(ProductFilter::default(), repo).map(|products| page.apply(products))
}

/// Lists active products only, as shown to shoppers.
pub fn list_active_products<R>(page: PageRequest, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    load_products(ProductFilter::default().status(true), repo).map(|products| page.apply(products))
}

pub fn get_product<R>(product_id: Option<i32>, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let product_id = require_id(product_id, ProductId::new, || {
        ServiceError::NotFound("product not found".to_string())
    })?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(product_not_found(product_id)),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn search_products<R>(
    page: PageRequest,
    search: ProductSearch,
    repo: &R,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    match search.into_filter() {
        Some(filter) => load_products(filter, repo).map(|products| page.apply(products)),
        None => Ok(Vec::new()),
    }
}

/// Active products of one category, in store order.
pub fn products_by_category<R>(category_id: Option<i32>, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    let category_id = require_id(category_id, CategoryId::new, || {
        ServiceError::BadRequest("category id is required".to_string())
    })?;

    load_products(
        ProductFilter::default().category(category_id).status(true),
        repo,
    )
}

/// Active products, most recently created first.
pub fn newest_products<R>(page: PageRequest, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    let filter = ProductFilter::default()
        .status(true)
        .order(ProductOrder::NewestFirst);
    load_products(filter, repo).map(|products| page.apply(products))
}

/// Active products with the largest stock first.
pub fn products_by_quantity_desc<R>(page: PageRequest, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    let filter = ProductFilter::default()
        .status(true)
        .order(ProductOrder::QuantityDescending);
    load_products(filter, repo).map(|products| page.apply(products))
}

pub fn create_product<R>(form: ProductForm, repo: &R, images: &ImageStore) -> ServiceResult<Product>
where
    R: CategoryReader + ProductWriter,
{
    let NewProductPayload { attributes } = NewProductPayload::try_from(form)?;

    ensure_category_exists(attributes.category_id, repo)?;

    let image = attributes
        .image
        .as_deref()
        .map(|image| images.ingest(image, ImageTarget::Product))
        .transpose()?;

    let product = NewProduct {
        category_id: attributes.category_id,
        name: attributes.name,
        price: attributes.price,
        quantity: attributes.quantity,
        address: attributes.address,
        description: attributes.description,
        image,
        status: attributes.status,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_product(&product) {
        Ok(created) => {
            log::info!("Created product {} ({})", created.id, created.name);
            Ok(created)
        }
        Err(RepositoryError::ForeignKeyViolation(_)) => {
            discard_image(images, product.image.as_ref());
            Err(unknown_category(product.category_id))
        }
        Err(e) => {
            log::error!("Failed to create product: {e}");
            discard_image(images, product.image.as_ref());
            Err(ServiceError::Internal)
        }
    }
}

pub fn update_product<R>(form: ProductForm, repo: &R, images: &ImageStore) -> ServiceResult<Product>
where
    R: CategoryReader + ProductReader + ProductWriter,
{
    let UpdateProductPayload { id, attributes } = UpdateProductPayload::try_from(form)?;

    match repo.get_product_by_id(id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(product_not_found(id)),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    ensure_category_exists(attributes.category_id, repo)?;

    let image = attributes
        .image
        .as_deref()
        .map(|image| images.ingest(image, ImageTarget::Product))
        .transpose()?;

    let changes = ProductChanges {
        category_id: attributes.category_id,
        name: attributes.name,
        price: attributes.price,
        quantity: attributes.quantity,
        address: attributes.address,
        description: attributes.description,
        image,
        status: attributes.status,
        updated_at: Utc::now().naive_utc(),
    };

    match repo.update_product(id, &changes) {
        Ok(0) => {
            discard_image(images, changes.image.as_ref());
            return Err(product_not_found(id));
        }
        Ok(_) => log::info!("Updated product {id}"),
        Err(RepositoryError::ForeignKeyViolation(_)) => {
            discard_image(images, changes.image.as_ref());
            return Err(unknown_category(changes.category_id));
        }
        Err(e) => {
            log::error!("Failed to update product: {e}");
            discard_image(images, changes.image.as_ref());
            return Err(ServiceError::Internal);
        }
    }

    match repo.get_product_by_id(id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(product_not_found(id)),
        Err(e) => {
            log::error!("Failed to reload product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Soft-deletes a single product. Deleting an inactive product succeeds.
pub fn delete_product<R>(product_id: Option<i32>, repo: &R) -> ServiceResult<ProductId>
where
    R: ProductReader + ProductWriter,
{
    let product_id = require_id(product_id, ProductId::new, || {
        ServiceError::BadRequest("product id is required".to_string())
    })?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(ServiceError::BadRequest(format!(
                "product {product_id} does not exist"
            )));
        }
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.deactivate_product(product_id) {
        Ok(_) => {
            log::info!("Deactivated product {product_id}");
            Ok(product_id)
        }
        Err(e) => {
            log::error!("Failed to delete product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Returns all products ordered by `key`; unknown keys keep store order.
pub fn sort_products<R>(key: &str, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    let mut products = load_products(ProductFilter::default(), repo)?;
    if let Some(sort) = ProductSort::parse(key) {
        sort.apply(&mut products);
    }
    Ok(products)
}

fn ensure_category_exists<R>(category_id: CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(unknown_category(category_id)),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn unknown_category(category_id: CategoryId) -> ServiceError {
    ServiceError::BadRequest(format!("category {category_id} does not exist"))
}

fn product_not_found(id: ProductId) -> ServiceError {
    ServiceError::NotFound(format!("product {id} not found"))
}

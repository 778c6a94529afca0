use std::time::Duration;

use crate::cache::{CacheError, DEFAULT_TTL, ResponseCache};
use crate::domain::product::Product;
use crate::dto::response::Response;
use crate::repository::ProductReader;
use crate::services::products;

/// Cache-aside wrapper around [`products::products_by_category`].
///
/// Entries are never invalidated by writes; a mutation may stay invisible to
/// this path for up to `ttl`.
#[derive(Debug, Clone)]
pub struct ProductCache<C> {
    cache: C,
    ttl: Duration,
}

impl<C: ResponseCache> ProductCache<C> {
    pub fn new(cache: C) -> Self {
        Self::with_ttl(cache, DEFAULT_TTL)
    }

    pub fn with_ttl(cache: C, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Cache key for the products of one category.
    pub fn cache_key(category_id: i32) -> String {
        format!("CATEID_{category_id}")
    }

    /// Active products of a category, served from the cache when possible.
    pub fn products_by_category<R>(
        &self,
        category_id: Option<i32>,
        repo: &R,
    ) -> Response<Vec<Product>>
    where
        R: ProductReader,
    {
        let Some(raw_id) = category_id else {
            return load(category_id, repo);
        };
        let key = Self::cache_key(raw_id);

        match self.lookup(&key) {
            Ok(Some(response)) => return response,
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring cache entry {key}: {e}"),
        }

        let response = load(category_id, repo);
        if response.is_success() {
            if let Err(e) = self.store(&key, &response) {
                log::warn!("Failed to cache {key}: {e}");
            }
        }
        response
    }

    fn lookup(&self, key: &str) -> Result<Option<Response<Vec<Product>>>, CacheError> {
        match self.cache.get(key)? {
            Some(payload) if !payload.is_empty() => Ok(Some(serde_json::from_str(&payload)?)),
            _ => Ok(None),
        }
    }

    fn store(&self, key: &str, response: &Response<Vec<Product>>) -> Result<(), CacheError> {
        let payload = serde_json::to_string(response)?;
        self.cache.set(key, payload, self.ttl)
    }
}

fn load<R>(category_id: Option<i32>, repo: &R) -> Response<Vec<Product>>
where
    R: ProductReader,
{
    Response::from_result(
        products::products_by_category(category_id, repo),
        "products retrieved",
    )
}

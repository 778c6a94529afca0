use chrono::Utc;
use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::domain::types::ProductId;
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset};
use crate::repository::{
    DieselRepository, ProductFilter, ProductOrder, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult, contains_pattern,
};

impl ProductReader for DieselRepository {
    fn list_products(&self, filter: ProductFilter) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table
            .select(DbProduct::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(name) = &filter.name_contains {
            items = items.filter(
                products::name_folded
                    .like(contains_pattern(name))
                    .escape('\\'),
            );
        }

        if let Some(quantity) = filter.quantity {
            items = items.filter(products::quantity.eq(quantity));
        }

        if let Some(price_min) = filter.price_min {
            items = items.filter(products::price.ge(price_min));
        }

        if let Some(price_max) = filter.price_max {
            items = items.filter(products::price.le(price_max));
        }

        if let Some(address) = &filter.address_contains {
            items = items.filter(
                products::address_folded
                    .like(contains_pattern(address))
                    .escape('\\'),
            );
        }

        if let Some(status) = filter.status {
            items = items.filter(products::status.eq(status));
        }

        if let Some(category_id) = filter.category_id {
            items = items.filter(products::category_id.eq(category_id.get()));
        }

        items = match filter.order {
            ProductOrder::Natural => items.order(products::id.asc()),
            ProductOrder::NewestFirst => {
                items.order((products::created_at.desc(), products::id.desc()))
            }
            ProductOrder::QuantityDescending => {
                items.order((products::quantity.desc(), products::id.asc()))
            }
        };

        let items = items
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .find(id.get())
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let created = diesel::insert_into(products::table)
            .values(db_product)
            .returning(DbProduct::as_returning())
            .get_result(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_product(&self, id: ProductId, changes: &ProductChanges) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let (changeset, image) = ProductChangeset::split(changes.clone());

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(products::table.find(id.get()))
                .set(changeset)
                .execute(conn)?;

            if let Some(image) = image {
                diesel::update(products::table.find(id.get()))
                    .set(image)
                    .execute(conn)?;
            }

            Ok(affected)
        })
    }

    fn deactivate_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = diesel::update(products::table.find(id.get()))
            .set((
                products::status.eq(false),
                products::updated_at.eq(Some(Utc::now().naive_utc())),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}

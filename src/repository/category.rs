use chrono::Utc;
use diesel::prelude::*;

use crate::domain::category::{Category, CategoryChanges, CategoryDeactivation, NewCategory};
use crate::domain::types::{CategoryId, CategoryName};
use crate::models::category::{
    Category as DbCategory, CategoryChangeset, NewCategory as DbNewCategory,
};
use crate::repository::{
    CategoryFilter, CategoryReader, CategoryWriter, DieselRepository, RepositoryError,
    RepositoryResult, contains_pattern,
};

impl CategoryReader for DieselRepository {
    fn list_categories(&self, filter: CategoryFilter) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut items = categories::table
            .select(DbCategory::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(name) = &filter.name_contains {
            items = items.filter(
                categories::name_folded
                    .like(contains_pattern(name))
                    .escape('\\'),
            );
        }

        if let Some(status) = filter.status {
            items = items.filter(categories::status.eq(status));
        }

        let items = items
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id.get())
            .select(DbCategory::as_select())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn find_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::name_folded.eq(name.folded()))
            .select(DbCategory::as_select())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(db_category)
            .returning(DbCategory::as_returning())
            .get_result(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let changeset: CategoryChangeset = changes.clone().into();

        let affected = diesel::update(categories::table.find(id.get()))
            .set(changeset)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn deactivate_category(&self, id: CategoryId) -> RepositoryResult<CategoryDeactivation> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(categories::table.find(id.get()))
                .set((
                    categories::status.eq(false),
                    categories::updated_at.eq(Some(now)),
                ))
                .execute(conn)?;

            if affected == 0 {
                return Err(diesel::result::Error::NotFound.into());
            }

            let deactivated_products = diesel::update(
                products::table
                    .filter(products::category_id.eq(id.get()))
                    .filter(products::status.eq(true)),
            )
            .set((
                products::status.eq(false),
                products::updated_at.eq(Some(now)),
            ))
            .execute(conn)?;

            Ok(CategoryDeactivation {
                category_id: id,
                deactivated_products,
            })
        })
    }
}

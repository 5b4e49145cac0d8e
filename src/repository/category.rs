use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::category::{Category, CategoryTranslation, NewCategory};
use crate::domain::translation::Translations;
use crate::domain::types::{CategoryId, TechnicalName};
use crate::models::category::{
    Category as DbCategory, CategoryTranslation as DbCategoryTranslation,
    NewCategory as DbNewCategory, NewCategoryTranslation as DbNewCategoryTranslation,
};
use crate::repository::cookie::delete_cookies;
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository, RepositoryError,
    RepositoryResult,
};

/// Attach translations to loaded category rows, keeping row order.
fn hydrate(conn: &mut SqliteConnection, rows: Vec<DbCategory>) -> RepositoryResult<Vec<Category>> {
    let translations = DbCategoryTranslation::belonging_to(&rows)
        .select(DbCategoryTranslation::as_select())
        .load::<DbCategoryTranslation>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(translations)
        .map(|pair| Ok(Category::try_from(pair)?))
        .collect()
}

pub(crate) fn load_category(
    conn: &mut SqliteConnection,
    id: i32,
) -> RepositoryResult<Option<Category>> {
    use crate::schema::cookie_categories;

    let row = cookie_categories::table
        .find(id)
        .first::<DbCategory>(conn)
        .optional()?;

    Ok(hydrate(conn, row.into_iter().collect())?.pop())
}

fn upsert_translations(
    conn: &mut SqliteConnection,
    category_id: i32,
    translations: &Translations<CategoryTranslation>,
) -> RepositoryResult<()> {
    use crate::schema::cookie_category_translations as t;

    for (locale, translation) in translations.iter() {
        let row = DbNewCategoryTranslation::new(category_id, locale, translation);
        diesel::insert_into(t::table)
            .values(&row)
            .on_conflict((t::category_id, t::locale))
            .do_update()
            .set(&row)
            .execute(conn)?;
    }
    Ok(())
}

pub(crate) fn insert_category(
    conn: &mut SqliteConnection,
    category: &NewCategory,
) -> RepositoryResult<Category> {
    use crate::schema::cookie_categories;

    let row = diesel::insert_into(cookie_categories::table)
        .values(&DbNewCategory::from(category))
        .returning(DbCategory::as_returning())
        .get_result(conn)?;

    upsert_translations(conn, row.id, &category.translations)?;
    load_category(conn, row.id)?.ok_or(RepositoryError::NotFound)
}

pub(crate) fn save_category(
    conn: &mut SqliteConnection,
    category: &Category,
) -> RepositoryResult<Category> {
    use crate::schema::cookie_categories;

    let id = category.id.get();
    let affected = diesel::update(cookie_categories::table.find(id))
        .set(&DbNewCategory::from(category))
        .execute(conn)?;
    if affected == 0 {
        return Err(RepositoryError::NotFound);
    }

    upsert_translations(conn, id, &category.translations)?;
    load_category(conn, id)?.ok_or(RepositoryError::NotFound)
}

impl CategoryReader for DieselRepository {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>> {
        use crate::schema::cookie_categories;

        let mut conn = self.conn()?;

        let mut items = cookie_categories::table.into_boxed::<Sqlite>();
        if query.active_only {
            items = items.filter(cookie_categories::active.eq(true));
        }

        let rows = items
            .order((cookie_categories::position.asc(), cookie_categories::id.asc()))
            .load::<DbCategory>(&mut conn)?;

        hydrate(&mut conn, rows)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        let mut conn = self.conn()?;
        load_category(&mut conn, id.get())
    }

    fn get_category_by_technical_name(
        &self,
        technical_name: &TechnicalName,
    ) -> RepositoryResult<Option<Category>> {
        use crate::schema::cookie_categories;

        let mut conn = self.conn()?;

        let row = cookie_categories::table
            .filter(cookie_categories::technical_name.eq(technical_name.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(hydrate(&mut conn, row.into_iter().collect())?.pop())
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| insert_category(conn, category))
    }

    fn update_category(&self, category: &Category) -> RepositoryResult<Category> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| save_category(conn, category))
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::{cookie_categories, cookie_category_translations, cookies};

        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let cookie_ids: Vec<i32> = cookies::table
                .filter(cookies::category_id.eq(id.get()))
                .select(cookies::id)
                .load(conn)?;
            delete_cookies(conn, &cookie_ids)?;

            diesel::delete(
                cookie_category_translations::table
                    .filter(cookie_category_translations::category_id.eq(id.get())),
            )
            .execute(conn)?;

            Ok(diesel::delete(cookie_categories::table.find(id.get())).execute(conn)?)
        })
    }
}

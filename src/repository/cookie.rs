use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::cookie::{Cookie, CookieItem, CookieTranslation, NewCookie};
use crate::domain::translation::Translations;
use crate::domain::types::{CookieId, CookieItemId, TechnicalName};
use crate::models::category::Category as DbCategory;
use crate::models::cookie::{
    Cookie as DbCookie, CookieItem as DbCookieItem,
    CookieItemTranslation as DbCookieItemTranslation, CookieTranslation as DbCookieTranslation,
    NewCookie as DbNewCookie, NewCookieItem as DbNewCookieItem,
    NewCookieItemTranslation as DbNewCookieItemTranslation,
    NewCookieTranslation as DbNewCookieTranslation,
};
use crate::repository::{
    CookieListQuery, CookieReader, CookieWriter, DieselRepository, RepositoryError,
    RepositoryResult,
};

fn hydrate_items(
    conn: &mut SqliteConnection,
    rows: Vec<DbCookieItem>,
) -> RepositoryResult<Vec<CookieItem>> {
    let translations = DbCookieItemTranslation::belonging_to(&rows)
        .select(DbCookieItemTranslation::as_select())
        .load::<DbCookieItemTranslation>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(translations)
        .map(|pair| Ok(CookieItem::try_from(pair)?))
        .collect()
}

/// Attach translations and items to loaded cookie rows, keeping row order.
fn hydrate(conn: &mut SqliteConnection, rows: Vec<DbCookie>) -> RepositoryResult<Vec<Cookie>> {
    use crate::schema::cookie_items;

    let translations = DbCookieTranslation::belonging_to(&rows)
        .select(DbCookieTranslation::as_select())
        .load::<DbCookieTranslation>(conn)?
        .grouped_by(&rows);

    let item_rows = DbCookieItem::belonging_to(&rows)
        .select(DbCookieItem::as_select())
        .order((cookie_items::position.asc(), cookie_items::id.asc()))
        .load::<DbCookieItem>(conn)?;
    let owners: Vec<i32> = item_rows.iter().map(|item| item.cookie_id).collect();

    let mut items_by_cookie: HashMap<i32, Vec<CookieItem>> = HashMap::new();
    for (cookie_id, item) in owners.into_iter().zip(hydrate_items(conn, item_rows)?) {
        items_by_cookie.entry(cookie_id).or_default().push(item);
    }

    rows.into_iter()
        .zip(translations)
        .map(|(row, translations)| {
            let items = items_by_cookie.remove(&row.id).unwrap_or_default();
            Ok(Cookie::try_from((row, translations, items))?)
        })
        .collect()
}

pub(crate) fn load_cookie(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Option<Cookie>> {
    use crate::schema::cookies;

    let row = cookies::table.find(id).first::<DbCookie>(conn).optional()?;
    Ok(hydrate(conn, row.into_iter().collect())?.pop())
}

fn upsert_translations(
    conn: &mut SqliteConnection,
    cookie_id: i32,
    translations: &Translations<CookieTranslation>,
) -> RepositoryResult<()> {
    use crate::schema::cookie_translations as t;

    for (locale, translation) in translations.iter() {
        let row = DbNewCookieTranslation::new(cookie_id, locale, translation);
        diesel::insert_into(t::table)
            .values(&row)
            .on_conflict((t::cookie_id, t::locale))
            .do_update()
            .set(&row)
            .execute(conn)?;
    }
    Ok(())
}

fn upsert_item_translations(
    conn: &mut SqliteConnection,
    item_id: i32,
    item: &CookieItem,
) -> RepositoryResult<()> {
    use crate::schema::cookie_item_translations as t;

    for (locale, translation) in item.translations.iter() {
        let row = DbNewCookieItemTranslation::new(item_id, locale, translation);
        diesel::insert_into(t::table)
            .values(&row)
            .on_conflict((t::cookie_item_id, t::locale))
            .do_update()
            .set(&row)
            .execute(conn)?;
    }
    Ok(())
}

fn insert_item(conn: &mut SqliteConnection, cookie_id: i32, item: &CookieItem) -> RepositoryResult<()> {
    use crate::schema::cookie_items;

    let item_id = diesel::insert_into(cookie_items::table)
        .values(&DbNewCookieItem::new(cookie_id, item))
        .returning(cookie_items::id)
        .get_result::<i32>(conn)?;
    upsert_item_translations(conn, item_id, item)
}

fn update_item(
    conn: &mut SqliteConnection,
    cookie_id: i32,
    item_id: i32,
    item: &CookieItem,
) -> RepositoryResult<()> {
    use crate::schema::cookie_items;

    let affected = diesel::update(
        cookie_items::table
            .filter(cookie_items::id.eq(item_id))
            .filter(cookie_items::cookie_id.eq(cookie_id)),
    )
    .set(&DbNewCookieItem::new(cookie_id, item))
    .execute(conn)?;
    if affected == 0 {
        return Err(RepositoryError::NotFound);
    }
    upsert_item_translations(conn, item_id, item)
}

fn delete_items(conn: &mut SqliteConnection, item_ids: &[i32]) -> RepositoryResult<usize> {
    use crate::schema::{cookie_item_translations, cookie_items};

    if item_ids.is_empty() {
        return Ok(0);
    }
    diesel::delete(
        cookie_item_translations::table
            .filter(cookie_item_translations::cookie_item_id.eq_any(item_ids)),
    )
    .execute(conn)?;
    Ok(diesel::delete(cookie_items::table.filter(cookie_items::id.eq_any(item_ids))).execute(conn)?)
}

/// Delete the given cookies with their items and translations.
pub(crate) fn delete_cookies(
    conn: &mut SqliteConnection,
    cookie_ids: &[i32],
) -> RepositoryResult<usize> {
    use crate::schema::{cookie_items, cookie_translations, cookies};

    if cookie_ids.is_empty() {
        return Ok(0);
    }
    let item_ids: Vec<i32> = cookie_items::table
        .filter(cookie_items::cookie_id.eq_any(cookie_ids))
        .select(cookie_items::id)
        .load(conn)?;
    delete_items(conn, &item_ids)?;

    diesel::delete(cookie_translations::table.filter(cookie_translations::cookie_id.eq_any(cookie_ids)))
        .execute(conn)?;
    Ok(diesel::delete(cookies::table.filter(cookies::id.eq_any(cookie_ids))).execute(conn)?)
}

pub(crate) fn insert_cookie(conn: &mut SqliteConnection, cookie: &NewCookie) -> RepositoryResult<Cookie> {
    use crate::schema::cookies;

    let row = diesel::insert_into(cookies::table)
        .values(&DbNewCookie::from(cookie))
        .returning(DbCookie::as_returning())
        .get_result(conn)?;

    upsert_translations(conn, row.id, &cookie.translations)?;
    for item in &cookie.items {
        insert_item(conn, row.id, item)?;
    }
    load_cookie(conn, row.id)?.ok_or(RepositoryError::NotFound)
}

pub(crate) fn save_cookie(conn: &mut SqliteConnection, cookie: &Cookie) -> RepositoryResult<Cookie> {
    use crate::schema::{cookie_items, cookies};

    let id = cookie.id.get();
    let affected = diesel::update(cookies::table.find(id))
        .set(&DbNewCookie::from(cookie))
        .execute(conn)?;
    if affected == 0 {
        return Err(RepositoryError::NotFound);
    }
    upsert_translations(conn, id, &cookie.translations)?;

    // Removals go first so a re-created item may reuse a freed name.
    let kept: HashSet<i32> = cookie
        .items
        .iter()
        .filter_map(|item| item.id.map(CookieItemId::get))
        .collect();
    let removed: Vec<i32> = cookie_items::table
        .filter(cookie_items::cookie_id.eq(id))
        .select(cookie_items::id)
        .load::<i32>(conn)?
        .into_iter()
        .filter(|item_id| !kept.contains(item_id))
        .collect();
    delete_items(conn, &removed)?;

    for item in cookie.items.iter().filter(|item| item.id.is_some()) {
        if let Some(item_id) = item.id {
            update_item(conn, id, item_id.get(), item)?;
        }
    }
    for item in cookie.items.iter().filter(|item| item.id.is_none()) {
        insert_item(conn, id, item)?;
    }

    load_cookie(conn, id)?.ok_or(RepositoryError::NotFound)
}

impl CookieReader for DieselRepository {
    fn list_cookies(&self, query: CookieListQuery) -> RepositoryResult<Vec<Cookie>> {
        use crate::schema::{cookie_categories, cookies};

        let mut conn = self.conn()?;

        let mut items = cookies::table
            .inner_join(cookie_categories::table)
            .into_boxed::<Sqlite>();
        if query.active_only {
            items = items
                .filter(cookies::active.eq(true))
                .filter(cookie_categories::active.eq(true));
        }
        if let Some(category_id) = query.category_id {
            items = items.filter(cookies::category_id.eq(category_id.get()));
        }

        let rows = items
            .order((
                cookie_categories::position.asc(),
                cookies::position.asc(),
                cookies::id.asc(),
            ))
            .load::<(DbCookie, DbCategory)>(&mut conn)?
            .into_iter()
            .map(|(cookie, _)| cookie)
            .collect();

        hydrate(&mut conn, rows)
    }

    fn get_cookie_by_id(&self, id: CookieId) -> RepositoryResult<Option<Cookie>> {
        let mut conn = self.conn()?;
        load_cookie(&mut conn, id.get())
    }

    fn get_cookie_by_technical_name(
        &self,
        technical_name: &TechnicalName,
    ) -> RepositoryResult<Option<Cookie>> {
        use crate::schema::cookies;

        let mut conn = self.conn()?;

        let row = cookies::table
            .filter(cookies::technical_name.eq(technical_name.as_str()))
            .first::<DbCookie>(&mut conn)
            .optional()?;

        Ok(hydrate(&mut conn, row.into_iter().collect())?.pop())
    }
}

impl CookieWriter for DieselRepository {
    fn create_cookie(&self, cookie: &NewCookie) -> RepositoryResult<Cookie> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| insert_cookie(conn, cookie))
    }

    fn update_cookie(&self, cookie: &Cookie) -> RepositoryResult<Cookie> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| save_cookie(conn, cookie))
    }

    fn delete_cookie(&self, id: CookieId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| delete_cookies(conn, &[id.get()]))
    }
}

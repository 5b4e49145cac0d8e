use diesel::Connection;

use crate::repository::category::{insert_category, save_category};
use crate::repository::cookie::{insert_cookie, save_cookie};
use crate::repository::{
    CategoryWrite, CookieWrite, DieselRepository, RepositoryResult, TaxonomyBatchWriter,
};

impl TaxonomyBatchWriter for DieselRepository {
    fn write_categories(&self, writes: &[CategoryWrite]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            for write in writes {
                match write {
                    CategoryWrite::Create(category) => {
                        insert_category(conn, category)?;
                    }
                    CategoryWrite::Update(category) => {
                        save_category(conn, category)?;
                    }
                }
            }
            Ok(writes.len())
        })
    }

    fn write_cookies(&self, writes: &[CookieWrite]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            for write in writes {
                match write {
                    CookieWrite::Create(cookie) => {
                        insert_cookie(conn, cookie)?;
                    }
                    CookieWrite::Update(cookie) => {
                        save_cookie(conn, cookie)?;
                    }
                }
            }
            Ok(writes.len())
        })
    }
}

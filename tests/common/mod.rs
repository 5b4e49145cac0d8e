//! Helpers for integration tests.

use sulu_cookie_consent::db::{DbPool, establish_connection_pool, run_migrations};
use sulu_cookie_consent::repository::DieselRepository;
use tempfile::NamedTempFile;

/// Migrated SQLite database living in a temporary file.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let path = tempfile.path().to_str().expect("temp path is UTF-8");
        let pool = establish_connection_pool(path).expect("Failed to open SQLite database.");
        run_migrations(&pool).expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    #[allow(dead_code)]
    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

use sulu_cookie_consent::db::{foreign_keys_enabled, run_migrations};

mod common;

#[test]
fn pooled_connections_enforce_foreign_keys() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let mut conn = pool.get().expect("should acquire DB connection");

    assert!(foreign_keys_enabled(&mut conn));
}

#[test]
fn migrations_are_idempotent() {
    let test_db = common::TestDb::new();

    run_migrations(&test_db.pool()).expect("already migrated database should be accepted");
}

use sqlx::PgPool;

/// All `id` columns must be bigint (entity tables) or smallint (lookup tables).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_correct_type(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert!(
            data_type == "bigint" || data_type == "smallint",
            "Table {table}.id should be bigint or smallint, got {data_type}"
        );
    }
}

/// The API maps constraint violations by name prefix, so every named
/// constraint must follow the `uq_` / `fk_` / `ck_` convention.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_constraint_name_prefixes(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT c.conname::TEXT, c.contype::TEXT
         FROM pg_constraint c
         JOIN pg_namespace n ON n.oid = c.connamespace
         WHERE n.nspname = 'public'
           AND c.contype IN ('u', 'f', 'c')
         ORDER BY c.conname",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (name, kind) in &rows {
        let prefix = match kind.as_str() {
            "u" => "uq_",
            "f" => "fk_",
            _ => "ck_",
        };
        assert!(
            name.starts_with(prefix),
            "Constraint {name} (type {kind}) should start with {prefix}"
        );
    }
}

/// No character varying columns should exist; TEXT is preferred.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "Found VARCHAR columns: {rows:?}");
}

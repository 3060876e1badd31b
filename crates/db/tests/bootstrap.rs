use sqlx::PgPool;

/// Connect, migrate and verify every ledger table exists.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_full_bootstrap(pool: PgPool) {
    tracker_db::health_check(&pool).await.unwrap();

    let tables = [
        "ledger_meta",
        "projects",
        "milestones",
        "role_grants",
        "ledger_events",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Project columns must follow the record layout.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_project_columns_follow_layout(pool: PgPool) {
    let columns: Vec<(String,)> = sqlx::query_as(
        "SELECT column_name::text FROM information_schema.columns \
         WHERE table_name = 'projects' ORDER BY ordinal_position",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let names: Vec<&str> = columns.iter().map(|(c,)| c.as_str()).collect();
    assert_eq!(names[0], "slot_id");
    assert_eq!(&names[1..], tracker_core::state::PROJECT_LAYOUT);
}

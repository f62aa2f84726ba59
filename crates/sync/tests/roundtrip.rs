//! Integration tests for dumping and replaying databases.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use vitrine_sync::dump::dump_database;
use vitrine_sync::executor::execute_script;
use vitrine_sync::options::{DataMode, DumpOptions, SyncDirection, SyncMode, SyncRequest};
use vitrine_sync::orchestrator::{run_sync, SyncSettings};
use vitrine_sync::progress::ProgressReporter;
use vitrine_sync::rewrite::UrlRewrite;
use vitrine_sync::schema;

const CONTENT_TABLES: &[&str] = &[
    "categories",
    "products",
    "quote_requests",
    "site_options",
    "homepage_sections",
    "translations",
];

async fn seed(pool: &MySqlPool) {
    sqlx::raw_sql(
        r#"
        INSERT INTO categories (id, name, slug, description) VALUES
            (1, 'Pumps', 'pumps', 'Centrifugal; and positive displacement'),
            (2, 'Valves', 'valves', NULL);
        INSERT INTO products
            (category_id, name, slug, sku, summary, specifications, is_published) VALUES
            (1, 'Pump X', 'pump-x', 'PX-1', 'It''s the "best" pump',
                '{"flow": "10 m3/h", "max_bar": 6}', TRUE),
            (1, 'Pump Y', 'pump-y', NULL, 'Größe ✓', NULL, FALSE),
            (2, 'Valve V', 'valve-v', 'VV-9', 'Back\\slash', '[1, 2, 3]', TRUE);
        INSERT INTO quote_requests (name, email, items) VALUES
            ('Ada', 'ada@example.com', '[{"product_name": "Pump X", "quantity": 2}]');
        INSERT INTO site_options (option_key, option_value) VALUES
            ('site_name', 'Acme Industrial'),
            ('footer_text', 'Line one\nLine two');
        INSERT INTO homepage_sections (section_type, title, content, position) VALUES
            ('hero', 'Welcome',
                '{"image": "http://localhost:8080/uploads/hero.jpg",
                  "links": ["http://localhost:8080/products"]}', 0),
            ('cta', NULL, '{"text": "Call us"}', 1);
        INSERT INTO translations (locale, translation_key, translation_value) VALUES
            ('en', 'nav.home', 'Home'),
            ('de', 'nav.home', 'Startseite');
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn counts(pool: &MySqlPool) -> Vec<(String, i64)> {
    let mut conn = pool.acquire().await.unwrap();
    let mut out = Vec::new();
    for table in CONTENT_TABLES {
        out.push((table.to_string(), schema::row_count(&mut conn, table).await.unwrap()));
    }
    out
}

async fn drop_all_tables(pool: &MySqlPool) {
    let mut conn = pool.acquire().await.unwrap();
    let tables = schema::list_tables(&mut conn).await.unwrap();
    sqlx::raw_sql("SET FOREIGN_KEY_CHECKS=0").execute(&mut *conn).await.unwrap();
    for table in tables {
        sqlx::raw_sql(&format!("DROP TABLE `{table}`"))
            .execute(&mut *conn)
            .await
            .unwrap();
    }
    sqlx::raw_sql("SET FOREIGN_KEY_CHECKS=1").execute(&mut *conn).await.unwrap();
}

/// A second, empty database on the same server standing in for the remote.
async fn create_remote(pool: &MySqlPool) -> (MySqlPool, String) {
    let local_name: String = sqlx::query_scalar("SELECT DATABASE()")
        .fetch_one(pool)
        .await
        .unwrap();
    let remote_name = format!("{local_name}_remote");
    sqlx::raw_sql(&format!("DROP DATABASE IF EXISTS `{remote_name}`"))
        .execute(pool)
        .await
        .unwrap();
    sqlx::raw_sql(&format!("CREATE DATABASE `{remote_name}`"))
        .execute(pool)
        .await
        .unwrap();
    let remote_options = pool.connect_options().as_ref().clone().database(&remote_name);
    let remote = MySqlPoolOptions::new()
        .max_connections(2)
        .connect_with(remote_options)
        .await
        .unwrap();
    (remote, remote_name)
}

async fn drop_remote(pool: &MySqlPool, remote: MySqlPool, remote_name: &str) {
    remote.close().await;
    sqlx::raw_sql(&format!("DROP DATABASE `{remote_name}`"))
        .execute(pool)
        .await
        .unwrap();
}

async fn option_value(pool: &MySqlPool, key: &str) -> String {
    sqlx::query_scalar("SELECT option_value FROM site_options WHERE option_key = ?")
        .bind(key)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn category_snapshot(pool: &MySqlPool) -> Vec<(i64, String, String, Option<String>)> {
    sqlx::query_as("SELECT id, name, slug, description FROM categories ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_dump_and_replay_reproduces_row_counts(pool: MySqlPool) {
    seed(&pool).await;
    let before = counts(&pool).await;

    let dump = dump_database(
        &pool,
        &DumpOptions {
            page_size: 2,
            ..DumpOptions::default()
        },
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();
    assert!(dump.errors.is_empty());
    assert!(dump.sql.contains("DROP TABLE IF EXISTS `products`"));
    assert!(dump
        .sql
        .trim_end()
        .ends_with(&format!("-- Statements: {}", dump.statement_count)));

    drop_all_tables(&pool).await;

    let report = execute_script(&pool, &dump.sql, &ProgressReporter::silent())
        .await
        .unwrap();
    assert_eq!(report.errored, 0, "errors: {:?}", report.errors);
    assert_eq!(report.parsed, dump.statement_count);
    assert_eq!(counts(&pool).await, before);

    let summary: String = sqlx::query_scalar("SELECT summary FROM products WHERE slug = 'pump-x'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(summary, r#"It's the "best" pump"#);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_semicolon_inside_string_is_one_statement(pool: MySqlPool) {
    let report = execute_script(
        &pool,
        "CREATE TABLE notes (id INT PRIMARY KEY, msg VARCHAR(50));\n\
         INSERT INTO notes (id, msg) VALUES (1, 'a;b');",
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();
    assert_eq!(report.parsed, 2);
    assert_eq!(report.executed, 2);

    let msg: String = sqlx::query_scalar("SELECT msg FROM notes WHERE id = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(msg, "a;b");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_statements_are_recorded_and_skipped(pool: MySqlPool) {
    let report = execute_script(
        &pool,
        "INSERT INTO site_options (option_key, option_value) VALUES ('a', '1');\n\
         INSERT INTO no_such_table VALUES (1);\n\
         INSERT INTO site_options (option_key, option_value) VALUES ('b', '2')",
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();

    assert_eq!(report.parsed, 3);
    assert_eq!(report.executed, 2);
    assert_eq!(report.errored, 1);
    assert_eq!(report.errors[0].index, 1);
    assert!(report.errors[0].statement_preview.contains("no_such_table"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_values_round_trip_exactly(pool: MySqlPool) {
    sqlx::raw_sql(
        r#"
        CREATE TABLE value_samples (
            id    INT PRIMARY KEY,
            flag  BOOLEAN NOT NULL,
            n     BIGINT NULL,
            f     DOUBLE NULL,
            d     DECIMAL(10,2) NULL,
            s     VARCHAR(255) NULL,
            b     VARBINARY(16) NULL
        );
        INSERT INTO value_samples VALUES
            (1, TRUE, -9007199254740993, 3.14159, 12.50,
                'Zoë says "hi"; it''s 日本\\n', X'00FF7F'),
            (2, FALSE, NULL, NULL, NULL, NULL, NULL);
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    type Row = (
        i32,
        bool,
        Option<i64>,
        Option<f64>,
        Option<String>,
        Option<String>,
        Option<Vec<u8>>,
    );
    let select = "SELECT id, flag, n, f, CAST(d AS CHAR), s, b FROM value_samples ORDER BY id";
    let original: Vec<Row> = sqlx::query_as(select).fetch_all(&pool).await.unwrap();

    let dump = dump_database(
        &pool,
        &DumpOptions {
            tables: Some(vec!["value_samples".to_string()]),
            ..DumpOptions::default()
        },
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();

    sqlx::raw_sql("DROP TABLE value_samples").execute(&pool).await.unwrap();
    let report = execute_script(&pool, &dump.sql, &ProgressReporter::silent())
        .await
        .unwrap();
    assert_eq!(report.errored, 0, "errors: {:?}", report.errors);

    let restored: Vec<Row> = sqlx::query_as(select).fetch_all(&pool).await.unwrap();
    assert_eq!(restored, original);
    assert_eq!(restored[0].6.as_deref(), Some(&[0x00, 0xFF, 0x7F][..]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_generated_columns_are_left_to_the_server(pool: MySqlPool) {
    sqlx::raw_sql(
        r#"
        CREATE TABLE price_lines (
            id       INT PRIMARY KEY,
            net      INT NOT NULL,
            gross    INT AS (net * 2) VIRTUAL,
            doubled  INT AS (net * 4) STORED
        );
        INSERT INTO price_lines (id, net) VALUES (1, 10), (2, 25);
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let dump = dump_database(
        &pool,
        &DumpOptions {
            tables: Some(vec!["price_lines".to_string()]),
            ..DumpOptions::default()
        },
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();
    assert!(dump.errors.is_empty());
    assert!(dump.sql.contains("INSERT INTO `price_lines` (`id`, `net`) VALUES"));

    let report = execute_script(&pool, &dump.sql, &ProgressReporter::silent())
        .await
        .unwrap();
    assert_eq!(report.errored, 0, "errors: {:?}", report.errors);

    let rows: Vec<(i32, i32, i32, i32)> =
        sqlx::query_as("SELECT id, net, gross, doubled FROM price_lines ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(rows, vec![(1, 10, 20, 40), (2, 25, 50, 100)]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_table_is_reported_and_the_rest_dumped(pool: MySqlPool) {
    seed(&pool).await;
    let seeded = category_snapshot(&pool).await;

    let dump = dump_database(
        &pool,
        &DumpOptions {
            tables: Some(vec!["no_such_table".to_string(), "categories".to_string()]),
            ..DumpOptions::default()
        },
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();

    assert_eq!(dump.errors.len(), 1);
    assert_eq!(dump.errors[0].table, "no_such_table");
    assert!(dump.sql.contains("-- Error dumping table no_such_table: "));
    assert_eq!(dump.tables.len(), 1);
    assert_eq!(dump.tables[0].name, "categories");
    assert_eq!(dump.tables[0].rows, 2);

    let report = execute_script(&pool, &dump.sql, &ProgressReporter::silent())
        .await
        .unwrap();
    assert_eq!(report.errored, 0, "errors: {:?}", report.errors);
    assert_eq!(report.parsed, dump.statement_count);
    assert_eq!(category_snapshot(&pool).await, seeded);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_append_mode_is_idempotent(pool: MySqlPool) {
    seed(&pool).await;
    let seeded = category_snapshot(&pool).await;

    let dump = dump_database(
        &pool,
        &DumpOptions {
            tables: Some(vec!["categories".to_string(), "translations".to_string()]),
            drop_tables: false,
            data_mode: DataMode::Append,
            ..DumpOptions::default()
        },
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();
    assert!(dump.sql.contains("CREATE TABLE IF NOT EXISTS `categories`"));
    assert!(dump.sql.contains("ON DUPLICATE KEY UPDATE"));
    assert!(!dump.sql.contains("DROP TABLE"));

    // Drift the target away from the source before merging.
    sqlx::raw_sql(
        "UPDATE categories SET name = 'Renamed' WHERE id = 1;\n\
         DELETE FROM categories WHERE id = 2;",
    )
    .execute(&pool)
    .await
    .unwrap();

    let first = execute_script(&pool, &dump.sql, &ProgressReporter::silent())
        .await
        .unwrap();
    assert_eq!(first.errored, 0, "errors: {:?}", first.errors);
    let once = category_snapshot(&pool).await;

    let second = execute_script(&pool, &dump.sql, &ProgressReporter::silent())
        .await
        .unwrap();
    assert_eq!(second.errored, 0);
    let twice = category_snapshot(&pool).await;

    assert_eq!(once, seeded);
    assert_eq!(twice, once);

    let translations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM translations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(translations, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_urls_are_rewritten_on_dump(pool: MySqlPool) {
    seed(&pool).await;

    let dump = dump_database(
        &pool,
        &DumpOptions {
            tables: Some(vec!["homepage_sections".to_string()]),
            url_rewrite: Some(UrlRewrite::new(
                "http://localhost:8080",
                "https://www.example.com",
            )),
            ..DumpOptions::default()
        },
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();
    assert_eq!(dump.url_replacements, 2);

    execute_script(&pool, &dump.sql, &ProgressReporter::silent())
        .await
        .unwrap();

    let content: sqlx::types::Json<serde_json::Value> =
        sqlx::query_scalar("SELECT content FROM homepage_sections WHERE section_type = 'hero'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(content.0["image"], "https://www.example.com/uploads/hero.jpg");
    assert_eq!(content.0["links"][0], "https://www.example.com/products");

    let cta: sqlx::types::Json<serde_json::Value> =
        sqlx::query_scalar("SELECT content FROM homepage_sections WHERE section_type = 'cta'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(cta.0, serde_json::json!({ "text": "Call us" }));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_push_copies_into_remote_with_backup(pool: MySqlPool) {
    seed(&pool).await;

    let (remote, remote_name) = create_remote(&pool).await;

    let backups = tempfile::tempdir().unwrap();
    let settings = SyncSettings {
        site_url: "http://localhost:8080/".to_string(),
        backup_dir: backups.path().to_path_buf(),
        page_size: 500,
    };
    let request = SyncRequest {
        create_backup: true,
        sync_mode: SyncMode::Full,
        data_mode: DataMode::Overwrite,
    };

    let summary = run_sync(
        &pool,
        &remote,
        Some("https://www.example.com"),
        SyncDirection::Push,
        &request,
        &settings,
        &ProgressReporter::silent(),
    )
    .await
    .unwrap();

    assert_eq!(summary.report.errored, 0, "errors: {:?}", summary.report.errors);
    assert!(summary.table_errors.is_empty());
    let backup_path = summary.backup_path.expect("backup should be written");
    assert!(std::path::Path::new(&backup_path).exists());
    assert_eq!(counts(&remote).await, counts(&pool).await);

    let image: String = sqlx::query_scalar(
        "SELECT JSON_UNQUOTE(JSON_EXTRACT(content, '$.image')) \
         FROM homepage_sections WHERE section_type = 'hero'",
    )
    .fetch_one(&remote)
    .await
    .unwrap();
    assert_eq!(image, "https://www.example.com/uploads/hero.jpg");

    drop_remote(&pool, remote, &remote_name).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_pull_keeps_local_connection_settings(pool: MySqlPool) {
    seed(&pool).await;
    sqlx::raw_sql(
        "INSERT INTO site_options (option_key, option_value) VALUES \
            ('cpanel_db_host', 'db.local.test'), \
            ('cpanel_db_password', ' spaced secret ')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (remote, remote_name) = create_remote(&pool).await;
    let backups = tempfile::tempdir().unwrap();
    let settings = SyncSettings {
        site_url: "http://localhost:8080".to_string(),
        backup_dir: backups.path().to_path_buf(),
        page_size: 500,
    };
    let request = SyncRequest {
        create_backup: false,
        sync_mode: SyncMode::Full,
        data_mode: DataMode::Overwrite,
    };
    let reporter = ProgressReporter::silent();

    run_sync(&pool, &remote, None, SyncDirection::Push, &request, &settings, &reporter)
        .await
        .unwrap();
    sqlx::raw_sql(
        "UPDATE site_options SET option_value = 'Acme Production' \
            WHERE option_key = 'site_name'; \
         UPDATE site_options SET option_value = 'db.remote.test' \
            WHERE option_key = 'cpanel_db_host'; \
         DELETE FROM site_options WHERE option_key = 'cpanel_db_password';",
    )
    .execute(&remote)
    .await
    .unwrap();

    let summary =
        run_sync(&pool, &remote, None, SyncDirection::Pull, &request, &settings, &reporter)
            .await
            .unwrap();
    assert_eq!(summary.report.errored, 0, "errors: {:?}", summary.report.errors);

    assert_eq!(option_value(&pool, "site_name").await, "Acme Production");
    assert_eq!(option_value(&pool, "cpanel_db_host").await, "db.local.test");
    assert_eq!(option_value(&pool, "cpanel_db_password").await, " spaced secret ");

    drop_remote(&pool, remote, &remote_name).await;
}

//! SQL dump generation.
//!
//! A dump is built entirely in memory as one script: header comments,
//! session settings, then per table the structure (`DROP` + the server's own
//! `CREATE TABLE`, or `CREATE TABLE IF NOT EXISTS` when appending) and the
//! data as multi-row `INSERT`s fetched page by page. A table that fails is
//! logged, noted in the script and skipped; the rest of the dump continues.

use serde::Serialize;
use sqlx::{MySqlConnection, MySqlPool};

use crate::error::{SyncError, SyncResult};
use crate::options::{DataMode, DumpOptions};
use crate::progress::{scaled_percent, ProgressReporter};
use crate::schema::{self, ColumnInfo};
use crate::value::{quote_identifier, ColumnKind, SqlValue};

/// A multi-row `INSERT` is flushed once its rendered rows exceed this size.
pub const MAX_INSERT_BYTES: usize = 1024 * 1024;

const GENERATOR: &str = "vitrine-sync";

/// The finished dump and what went into it.
#[derive(Debug, Clone)]
pub struct DumpOutput {
    pub sql: String,
    /// Data and structure statements in `sql`, excluding session `SET`s.
    pub statement_count: usize,
    pub tables: Vec<TableDump>,
    pub errors: Vec<TableError>,
    /// URL occurrences replaced in JSON content.
    pub url_replacements: usize,
}

impl DumpOutput {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDump {
    pub name: String,
    pub rows: u64,
    pub statements: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableError {
    pub table: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Script assembly
// ---------------------------------------------------------------------------

/// Accumulates statements and comments into a script.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    sql: String,
    statements: usize,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `-- ` comment. Newlines in `text` are flattened so the
    /// comment stays on one line.
    pub fn push_comment(&mut self, text: &str) {
        self.sql.push_str("-- ");
        self.sql.push_str(&text.replace(['\r', '\n'], " "));
        self.sql.push('\n');
    }

    pub fn push_blank_line(&mut self) {
        self.sql.push('\n');
    }

    /// Append a counted statement, terminated with `;`.
    pub fn push_statement(&mut self, statement: &str) {
        self.push_session_statement(statement);
        self.statements += 1;
    }

    /// Append a session statement (`SET ...`) that does not count towards
    /// the statement total.
    pub fn push_session_statement(&mut self, statement: &str) {
        self.sql.push_str(statement.trim_end().trim_end_matches(';'));
        self.sql.push_str(";\n");
    }

    pub fn append(&mut self, other: ScriptBuilder) {
        self.sql.push_str(&other.sql);
        self.statements += other.statements;
    }

    pub fn statement_count(&self) -> usize {
        self.statements
    }

    pub fn into_sql(self) -> String {
        self.sql
    }
}

// ---------------------------------------------------------------------------
// Statement builders
// ---------------------------------------------------------------------------

pub fn drop_table_statement(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(table))
}

/// Turn the server's `CREATE TABLE` into `CREATE TABLE IF NOT EXISTS`.
pub fn create_if_not_exists(ddl: &str) -> String {
    const PREFIX: &str = "CREATE TABLE ";
    let trimmed = ddl.trim_start();
    let has_prefix = trimmed
        .get(..PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(PREFIX));
    let already_guarded = trimmed
        .get(PREFIX.len()..PREFIX.len() + "IF NOT EXISTS".len())
        .is_some_and(|p| p.eq_ignore_ascii_case("IF NOT EXISTS"));

    if has_prefix && !already_guarded {
        format!("CREATE TABLE IF NOT EXISTS {}", &trimmed[PREFIX.len()..])
    } else {
        trimmed.to_string()
    }
}

/// The `ON DUPLICATE KEY UPDATE` clause for append-mode inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertPlan {
    assignments: Vec<String>,
}

impl UpsertPlan {
    /// Plan an upsert that refreshes every non-key column. Returns `None`
    /// when there are no key columns to detect duplicates with.
    pub fn new(columns: &[String], key: &[String]) -> Option<Self> {
        let first_key = key.first()?;
        let mut assignments: Vec<String> = columns
            .iter()
            .filter(|c| !key.contains(c))
            .map(|c| {
                let ident = quote_identifier(c);
                format!("{ident} = VALUES({ident})")
            })
            .collect();
        if assignments.is_empty() {
            // Every column is part of the key; a self-assignment keeps the
            // statement valid and leaves the row unchanged.
            let ident = quote_identifier(first_key);
            assignments.push(format!("{ident} = {ident}"));
        }
        Some(Self { assignments })
    }

    pub fn clause(&self) -> String {
        format!("ON DUPLICATE KEY UPDATE {}", self.assignments.join(", "))
    }
}

/// Render one row as a parenthesized tuple of literals.
pub fn render_row(values: &[SqlValue]) -> String {
    let literals: Vec<String> = values.iter().map(SqlValue::to_sql_literal).collect();
    format!("({})", literals.join(", "))
}

/// A multi-row `INSERT` over pre-rendered row tuples.
pub fn insert_from_tuples(
    table: &str,
    columns: &[String],
    tuples: &[String],
    upsert: Option<&UpsertPlan>,
) -> String {
    let column_list = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!(
        "INSERT INTO {} ({column_list}) VALUES\n{}",
        quote_identifier(table),
        tuples.join(",\n")
    );
    if let Some(plan) = upsert {
        sql.push('\n');
        sql.push_str(&plan.clause());
    }
    sql
}

// ---------------------------------------------------------------------------
// Dumping
// ---------------------------------------------------------------------------

/// Dump the pool's database on a single connection.
pub async fn dump_database(
    pool: &MySqlPool,
    options: &DumpOptions,
    reporter: &ProgressReporter,
) -> SyncResult<DumpOutput> {
    let mut conn = pool.acquire().await?;
    dump_connection(&mut conn, options, reporter).await
}

pub async fn dump_connection(
    conn: &mut MySqlConnection,
    options: &DumpOptions,
    reporter: &ProgressReporter,
) -> SyncResult<DumpOutput> {
    let database = schema::current_database(conn).await?.unwrap_or_default();
    let tables = match &options.tables {
        Some(tables) => tables.clone(),
        None => schema::list_tables(conn).await?,
    };

    let mut script = ScriptBuilder::new();
    script.push_comment(&format!("{GENERATOR} SQL dump"));
    script.push_comment(&format!(
        "Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    script.push_comment(&format!("Database: {database}"));
    script.push_comment(&format!(
        "Structure: {}, data: {}, mode: {}",
        options.include_structure,
        options.include_data,
        match options.data_mode {
            DataMode::Overwrite => "overwrite",
            DataMode::Append => "append",
        }
    ));
    script.push_blank_line();
    script.push_session_statement("SET FOREIGN_KEY_CHECKS=0");
    script.push_session_statement("SET NAMES utf8mb4");
    script.push_blank_line();

    let mut dumped = Vec::with_capacity(tables.len());
    let mut errors = Vec::new();
    let mut url_replacements = 0;

    for (index, table) in tables.iter().enumerate() {
        reporter.progress(
            "dump",
            scaled_percent(index, tables.len(), 0, 100),
            format!("Dumping table {table}"),
        );

        let mut section = ScriptBuilder::new();
        match dump_table(conn, table, options, reporter, &mut section).await {
            Ok((rows, replaced)) => {
                url_replacements += replaced;
                dumped.push(TableDump {
                    name: table.clone(),
                    rows,
                    statements: section.statement_count(),
                });
                script.append(section);
            }
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "Failed to dump table, skipping");
                reporter.warn(format!("Skipped table {table}: {e}"));
                script.push_comment(&format!("Error dumping table {table}: {e}"));
                script.push_blank_line();
                errors.push(TableError {
                    table: table.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    script.push_session_statement("SET FOREIGN_KEY_CHECKS=1");
    let statement_count = script.statement_count();
    script.push_blank_line();
    script.push_comment(&format!("Statements: {statement_count}"));

    tracing::info!(
        database = %database,
        tables = dumped.len(),
        failed = errors.len(),
        statements = statement_count,
        "Dump complete",
    );

    Ok(DumpOutput {
        sql: script.into_sql(),
        statement_count,
        tables: dumped,
        errors,
        url_replacements,
    })
}

/// Dump one table into `out`. Returns (rows, URL replacements).
async fn dump_table(
    conn: &mut MySqlConnection,
    table: &str,
    options: &DumpOptions,
    reporter: &ProgressReporter,
    out: &mut ScriptBuilder,
) -> SyncResult<(u64, usize)> {
    out.push_comment(&format!("Table {}", quote_identifier(table)));

    if options.include_structure {
        let ddl = schema::show_create_table(conn, table).await?;
        if options.drops_tables() {
            out.push_statement(&drop_table_statement(table));
            out.push_statement(&ddl);
        } else {
            out.push_statement(&create_if_not_exists(&ddl));
        }
    }

    if !options.include_data {
        out.push_blank_line();
        return Ok((0, 0));
    }

    let columns = schema::table_columns(conn, table).await?;
    if columns.is_empty() {
        return Err(SyncError::TableNotFound(table.to_string()));
    }
    let keys = schema::table_keys(conn, table).await?;
    let column_names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

    let upsert = match options.data_mode {
        DataMode::Overwrite => None,
        DataMode::Append => {
            let plan = UpsertPlan::new(&column_names, keys.identity());
            if plan.is_none() {
                tracing::warn!(
                    table = %table,
                    "No primary or unique key, appending with plain INSERT"
                );
                reporter.warn(format!(
                    "Table {table} has no primary or unique key; \
                     rows will be inserted without de-duplication"
                ));
                out.push_comment(
                    "WARNING: no primary or unique key, rows are not de-duplicated",
                );
            }
            plan
        }
    };

    let page_size = options.effective_page_size();
    let order_by = keys.identity().to_vec();
    let mut offset: u64 = 0;
    let mut rows: u64 = 0;
    let mut replaced = 0;
    let mut pending: Vec<String> = Vec::new();
    let mut pending_bytes = 0;

    loop {
        let page =
            schema::fetch_page(conn, table, &columns, &order_by, page_size, offset).await?;
        let fetched = page.len();

        for raw_row in page {
            let (tuple, count) = render_fetched_row(&columns, raw_row, options);
            replaced += count;
            pending_bytes += tuple.len();
            pending.push(tuple);
            if pending_bytes >= MAX_INSERT_BYTES {
                let insert = insert_from_tuples(table, &column_names, &pending, upsert.as_ref());
                out.push_statement(&insert);
                pending.clear();
                pending_bytes = 0;
            }
        }
        if !pending.is_empty() {
            let insert = insert_from_tuples(table, &column_names, &pending, upsert.as_ref());
            out.push_statement(&insert);
            pending.clear();
            pending_bytes = 0;
        }

        rows += fetched as u64;
        offset += fetched as u64;
        if fetched < page_size as usize {
            break;
        }
    }

    out.push_blank_line();
    tracing::debug!(table = %table, rows, "Dumped table");
    Ok((rows, replaced))
}

fn render_fetched_row(
    columns: &[ColumnInfo],
    raw_row: Vec<Option<String>>,
    options: &DumpOptions,
) -> (String, usize) {
    let mut replaced = 0;
    let values: Vec<SqlValue> = columns
        .iter()
        .zip(raw_row)
        .map(|(column, raw)| {
            let mut value = SqlValue::from_fetched(column.kind, raw);
            if let Some(rewrite) = &options.url_rewrite {
                if matches!(column.kind, ColumnKind::Json | ColumnKind::LongText) {
                    replaced += value.rewrite_urls(rewrite);
                }
            }
            value
        })
        .collect();
    (render_row(&values), replaced)
}

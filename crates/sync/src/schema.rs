//! Schema reflection against a live MySQL/MariaDB server.
//!
//! `information_schema` text columns are cast to `CHAR` because MySQL 8
//! reports several of them as `VARBINARY`.

use sqlx::{MySqlConnection, Row};

use crate::error::SyncResult;
use crate::value::{quote_identifier, ColumnKind};

/// A column as needed for dumping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub kind: ColumnKind,
}

impl ColumnInfo {
    pub fn select_expr(&self) -> String {
        self.kind.select_expr(&self.data_type, &self.name)
    }
}

/// Key columns used to order pages and to build upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableKeys {
    pub primary: Vec<String>,
    /// Columns of the first unique index, by name.
    pub unique: Option<Vec<String>>,
}

impl TableKeys {
    /// The columns that identify a row: the primary key, else the first
    /// unique index. Empty when the table has neither.
    pub fn identity(&self) -> &[String] {
        if !self.primary.is_empty() {
            &self.primary
        } else {
            self.unique.as_deref().unwrap_or(&[])
        }
    }
}

/// Base tables of the connection's current database, sorted by name.
pub async fn list_tables(conn: &mut MySqlConnection) -> SyncResult<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT CAST(TABLE_NAME AS CHAR) FROM information_schema.TABLES \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
         ORDER BY TABLE_NAME",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(tables)
}

/// Stored columns of `table` in ordinal order.
///
/// Generated columns are left out: the server computes them, and an
/// `INSERT` naming one is rejected.
pub async fn table_columns(
    conn: &mut MySqlConnection,
    table: &str,
) -> SyncResult<Vec<ColumnInfo>> {
    let rows = sqlx::query(
        "SELECT CAST(COLUMN_NAME AS CHAR) AS name, \
                CAST(DATA_TYPE AS CHAR) AS data_type, \
                CAST(COLUMN_TYPE AS CHAR) AS column_type, \
                CAST(EXTRA AS CHAR) AS extra \
         FROM information_schema.COLUMNS \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
         ORDER BY ORDINAL_POSITION",
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let extra: Option<String> = row.try_get("extra")?;
        if is_generated(extra.as_deref().unwrap_or_default()) {
            continue;
        }
        let name: String = row.try_get("name")?;
        let data_type: String = row.try_get("data_type")?;
        let column_type: String = row.try_get("column_type")?;
        columns.push(ColumnInfo {
            kind: ColumnKind::classify(&data_type, &column_type),
            name,
            data_type,
        });
    }
    Ok(columns)
}

/// Whether an `EXTRA` value marks a generated column.
///
/// MySQL reports `VIRTUAL GENERATED` / `STORED GENERATED`, MariaDB also
/// `PERSISTENT GENERATED`. MySQL 8's `DEFAULT_GENERATED` marks an expression
/// default on an ordinary column and does not count.
fn is_generated(extra: &str) -> bool {
    extra
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case("GENERATED"))
}

/// Primary key and first unique index of `table`.
pub async fn table_keys(conn: &mut MySqlConnection, table: &str) -> SyncResult<TableKeys> {
    let rows = sqlx::query(
        "SELECT CAST(INDEX_NAME AS CHAR) AS index_name, \
                CAST(COLUMN_NAME AS CHAR) AS column_name, \
                CAST(NON_UNIQUE AS SIGNED) AS non_unique \
         FROM information_schema.STATISTICS \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
         ORDER BY INDEX_NAME = 'PRIMARY' DESC, INDEX_NAME, SEQ_IN_INDEX",
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;

    let mut keys = TableKeys::default();
    // (index name, columns) per unique index, in name order.
    let mut unique: Vec<(String, Vec<Option<String>>)> = Vec::new();

    for row in &rows {
        let index_name: String = row.try_get("index_name")?;
        // Functional index parts have no column name.
        let column_name: Option<String> = row.try_get("column_name")?;
        let non_unique: i64 = row.try_get("non_unique")?;

        if index_name == "PRIMARY" {
            keys.primary.extend(column_name);
        } else if non_unique == 0 {
            match unique.last_mut() {
                Some((name, columns)) if *name == index_name => columns.push(column_name),
                _ => unique.push((index_name, vec![column_name])),
            }
        }
    }

    keys.unique = unique
        .into_iter()
        .find_map(|(_, columns)| columns.into_iter().collect::<Option<Vec<_>>>());

    Ok(keys)
}

/// The server's own `CREATE TABLE` statement for `table`.
pub async fn show_create_table(conn: &mut MySqlConnection, table: &str) -> SyncResult<String> {
    let row = sqlx::query(&format!("SHOW CREATE TABLE {}", quote_identifier(table)))
        .fetch_one(&mut *conn)
        .await?;
    // Decoded as bytes: some servers flag this column as binary.
    let ddl: Vec<u8> = row.try_get(1)?;
    Ok(String::from_utf8_lossy(&ddl).into_owned())
}

/// Exact row count of `table`.
pub async fn row_count(conn: &mut MySqlConnection, table: &str) -> SyncResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {}",
        quote_identifier(table)
    ))
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

/// Name of the connection's current database, if one is selected.
pub async fn current_database(conn: &mut MySqlConnection) -> SyncResult<Option<String>> {
    let name = sqlx::query_scalar::<_, Option<String>>("SELECT DATABASE()")
        .fetch_one(&mut *conn)
        .await?;
    Ok(name)
}

/// One page of `table`, every value fetched as text (see [`ColumnInfo::select_expr`]).
pub async fn fetch_page(
    conn: &mut MySqlConnection,
    table: &str,
    columns: &[ColumnInfo],
    order_by: &[String],
    limit: u32,
    offset: u64,
) -> SyncResult<Vec<Vec<Option<String>>>> {
    let select_list = columns
        .iter()
        .map(ColumnInfo::select_expr)
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {select_list} FROM {}", quote_identifier(table));
    if !order_by.is_empty() {
        let order = order_by
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" ORDER BY {order}"));
    }
    sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));

    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
    let mut page = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            values.push(row.try_get::<Option<String>, _>(i)?);
        }
        page.push(values);
    }
    Ok(page)
}

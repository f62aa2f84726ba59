//! Replay a SQL script against a database, one statement at a time.
//!
//! A failing statement is recorded and the run moves on. Foreign key checks
//! are disabled on the replay connection so tables can be recreated and
//! filled in any order.

use serde::Serialize;
use sqlx::{Executor, MySqlConnection, MySqlPool};

use crate::error::SyncResult;
use crate::progress::{scaled_percent, ProgressReporter};
use crate::splitter::split_statements;

const PREVIEW_CHARS: usize = 120;

/// Report progress after this many statements.
const PROGRESS_EVERY: usize = 25;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub parsed: usize,
    pub executed: usize,
    pub errored: usize,
    pub errors: Vec<StatementError>,
}

impl ExecutionReport {
    pub fn is_clean(&self) -> bool {
        self.errored == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementError {
    /// Zero-based position among the parsed statements.
    pub index: usize,
    pub message: String,
    pub statement_preview: String,
}

/// Split `script` and execute it on one connection from `pool`.
pub async fn execute_script(
    pool: &MySqlPool,
    script: &str,
    reporter: &ProgressReporter,
) -> SyncResult<ExecutionReport> {
    let mut conn = pool.acquire().await?;
    execute_on_connection(&mut conn, script, reporter).await
}

pub async fn execute_on_connection(
    conn: &mut MySqlConnection,
    script: &str,
    reporter: &ProgressReporter,
) -> SyncResult<ExecutionReport> {
    let statements = split_statements(script);
    let mut report = ExecutionReport {
        parsed: statements.len(),
        ..ExecutionReport::default()
    };
    reporter.info(format!("Parsed {} statements", report.parsed));

    conn.execute(sqlx::raw_sql("SET FOREIGN_KEY_CHECKS=0")).await?;

    for (index, statement) in statements.iter().enumerate() {
        match conn.execute(sqlx::raw_sql(statement)).await {
            Ok(_) => report.executed += 1,
            Err(e) => {
                let preview = preview(statement);
                tracing::warn!(index, error = %e, statement = %preview, "Statement failed");
                reporter.warn(format!("Statement {} failed: {e}", index + 1));
                report.errored += 1;
                report.errors.push(StatementError {
                    index,
                    message: e.to_string(),
                    statement_preview: preview,
                });
            }
        }

        let done = index + 1;
        if done % PROGRESS_EVERY == 0 || done == statements.len() {
            reporter.progress(
                "execute",
                scaled_percent(done, statements.len(), 0, 100),
                format!("Executed {done} of {} statements", statements.len()),
            );
        }
    }

    // Restore the session even when statements failed.
    conn.execute(sqlx::raw_sql("SET FOREIGN_KEY_CHECKS=1")).await?;

    tracing::info!(
        parsed = report.parsed,
        executed = report.executed,
        errored = report.errored,
        "Script executed",
    );
    Ok(report)
}

/// The first [`PREVIEW_CHARS`] characters of a statement on one line.
fn preview(statement: &str) -> String {
    let flat: String = statement
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

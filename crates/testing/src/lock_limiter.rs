//! Detection of row locks spanning several tables
//!
//! `SELECT ... FOR UPDATE` over a join locks the matching rows of every
//! joined table unless the lock is narrowed with `FOR UPDATE OF <table>`.

use sqlparser::ast::{Query, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::{TestError, TestResult};

/// Rejects locking selects that touch more than one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryLockLimiter {
    strict: bool,
}

impl QueryLockLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on SQL that cannot be parsed instead of letting it through
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn check(&self, sql: &str) -> TestResult<()> {
        let statements = match Parser::parse_sql(&PostgreSqlDialect {}, sql) {
            Ok(statements) => statements,
            Err(err) if self.strict => return Err(err.into()),
            Err(err) => {
                tracing::debug!("Lock limiter skipping unparsable SQL: {}", err);
                return Ok(());
            }
        };

        for statement in &statements {
            if let Statement::Query(query) = statement {
                check_query(query, sql)?;
            }
        }

        Ok(())
    }
}

fn check_query(query: &Query, sql: &str) -> TestResult<()> {
    let unrestricted = query.locks.iter().any(|lock| lock.of.is_none());

    if unrestricted {
        let tables = locked_tables(&query.body);
        if tables.len() > 1 {
            tracing::warn!("Locking select spans {:?}: {}", tables, sql);
            return Err(TestError::WouldSelectMultipleTablesForUpdate {
                sql: sql.to_string(),
                tables,
            });
        }
    }

    match query.body.as_ref() {
        SetExpr::Query(inner) => check_query(inner, sql),
        _ => Ok(()),
    }
}

fn locked_tables(body: &SetExpr) -> Vec<String> {
    match body {
        SetExpr::Select(select) => select.from.iter().flat_map(table_names).collect(),
        SetExpr::Query(inner) => locked_tables(&inner.body),
        _ => Vec::new(),
    }
}

fn table_names(from: &TableWithJoins) -> Vec<String> {
    std::iter::once(&from.relation)
        .chain(from.joins.iter().map(|join| &join.relation))
        .map(|relation| match relation {
            TableFactor::Table { name, .. } => name.to_string(),
            other => other.to_string(),
        })
        .collect()
}

//! Counting of executed SQL queries

use std::sync::{Mutex, PoisonError};

use crate::{TestError, TestResult};

/// Records executed queries and fails once more than `limit` were run
#[derive(Debug)]
pub struct QueryCounter {
    limit: usize,
    queries: Mutex<Vec<String>>,
}

impl QueryCounter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn record(&self, sql: impl Into<String>) {
        let sql = sql.into();
        tracing::trace!("Query #{}: {}", self.count() + 1, sql);
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).push(sql);
    }

    pub fn count(&self) -> usize {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Queries recorded so far, in execution order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of queries run, or `TooManyQueries` when over the limit
    pub fn check(&self) -> TestResult<usize> {
        let queries = self.queries();
        let executed = queries.len();

        if executed > self.limit {
            tracing::warn!("{} SQL queries executed, the limit is {}", executed, self.limit);
            return Err(TestError::TooManyQueries {
                limit: self.limit,
                executed,
                queries,
            });
        }

        Ok(executed)
    }

    /// Stop counting and check the total
    pub fn finish(self) -> TestResult<usize> {
        self.check()
    }
}

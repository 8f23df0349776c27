//! Database access linting around a unit of work

use std::sync::{Mutex, PoisonError};

use tweaks_core::LintConfig;

use crate::lock_limiter::QueryLockLimiter;
use crate::query_counter::QueryCounter;
use crate::{TestError, TestResult};

/// Handle the code under test reports its SQL to
#[derive(Debug)]
pub struct QueryRecorder {
    counter: QueryCounter,
    lock_limiter: Option<QueryLockLimiter>,
    violation: Mutex<Option<TestError>>,
}

impl QueryRecorder {
    fn new(query_limit: usize, lock_limiter: Option<QueryLockLimiter>) -> Self {
        Self {
            counter: QueryCounter::new(query_limit),
            lock_limiter,
            violation: Mutex::new(None),
        }
    }

    /// Record an executed statement
    pub fn record(&self, sql: &str) {
        self.counter.record(sql);

        let Some(limiter) = &self.lock_limiter else {
            return;
        };
        if let Err(err) = limiter.check(sql) {
            let mut violation = self.violation.lock().unwrap_or_else(PoisonError::into_inner);
            violation.get_or_insert(err);
        }
    }

    pub fn count(&self) -> usize {
        self.counter.count()
    }

    pub fn queries(&self) -> Vec<String> {
        self.counter.queries()
    }

    fn finish(self) -> TestResult<usize> {
        let violation = self.violation.into_inner().unwrap_or_else(PoisonError::into_inner);
        if let Some(err) = violation {
            return Err(err);
        }
        self.counter.finish()
    }
}

/// Runs a unit of work, typically one request, under the query counter
/// and optionally the lock limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseAccessLinter {
    query_limit: usize,
    lock_limiter: Option<QueryLockLimiter>,
}

impl DatabaseAccessLinter {
    /// Query counter and lock limiter
    pub fn new(query_limit: usize) -> Self {
        Self {
            query_limit,
            lock_limiter: Some(QueryLockLimiter::new()),
        }
    }

    /// Query counter only
    pub fn query_counting(query_limit: usize) -> Self {
        Self::new(query_limit).with_lock_limiter(false)
    }

    pub fn from_config(config: &LintConfig) -> Self {
        Self::new(config.query_limit).with_lock_limiter(config.lock_limiter)
    }

    pub fn with_lock_limiter(mut self, enabled: bool) -> Self {
        self.lock_limiter = enabled.then(QueryLockLimiter::new);
        self
    }

    pub fn query_limit(&self) -> usize {
        self.query_limit
    }

    pub fn has_lock_limiter(&self) -> bool {
        self.lock_limiter.is_some()
    }

    /// Run `work`, then fail on the first lock violation or on too many queries
    pub fn lint<F, T>(&self, work: F) -> TestResult<T>
    where
        F: FnOnce(&QueryRecorder) -> T,
    {
        let recorder = QueryRecorder::new(self.query_limit, self.lock_limiter);
        let output = work(&recorder);

        let executed = recorder.finish()?;
        tracing::debug!("Linted unit of work ran {} SQL queries", executed);
        Ok(output)
    }
}

impl Default for DatabaseAccessLinter {
    fn default() -> Self {
        Self::from_config(&LintConfig::default())
    }
}

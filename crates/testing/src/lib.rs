//! # tweaks-testing
//!
//! Database access linting for tests of optimized serializers:
//!
//! - **Query counting**: fail when a request runs more SQL queries than
//!   allowed, listing every query executed
//! - **Lock limiting**: fail on `SELECT ... FOR UPDATE` statements locking
//!   rows of several tables at once
//!
//! ## Quick Start
//!
//! ```rust
//! use tweaks_testing::prelude::*;
//!
//! let linter = DatabaseAccessLinter::new(3);
//! let rows = linter
//!     .lint(|recorder| {
//!         recorder.record("SELECT * FROM post");
//!         recorder.record("SELECT * FROM comment WHERE post_id IN (1, 2)");
//!         2
//!     })
//!     .unwrap();
//! assert_eq!(rows, 2);
//! ```

pub mod linter;
pub mod lock_limiter;
pub mod query_counter;

pub use linter::{DatabaseAccessLinter, QueryRecorder};
pub use lock_limiter::QueryLockLimiter;
pub use query_counter::QueryCounter;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        linter::{DatabaseAccessLinter, QueryRecorder},
        lock_limiter::QueryLockLimiter,
        query_counter::QueryCounter,
        TestError, TestResult,
    };
}

// Error handling
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TestError {
    #[error("Too many SQL queries: {executed} executed, the limit is {limit}\n{}", .queries.join("\n"))]
    TooManyQueries {
        limit: usize,
        executed: usize,
        queries: Vec<String>,
    },

    #[error("SELECT ... FOR UPDATE locks {tables:?}; restrict it with FOR UPDATE OF: {sql}")]
    WouldSelectMultipleTablesForUpdate { sql: String, tables: Vec<String> },

    #[error("Could not parse SQL: {0}")]
    SqlParse(#[from] sqlparser::parser::ParserError),
}

pub type TestResult<T> = Result<T, TestError>;

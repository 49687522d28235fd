//! Core test fixtures and utilities for parameterized cursor testing.
//!
//! Every connection handed out by [`test_connection`] is seeded with the same
//! answers, so a test can run one query under each [`TestMode`] and expect the
//! same rows back. The modes differ only in how rows are delivered.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sparqlz_driver_tests::fixtures::{execute, test_connection, TestMode, THREE_ROWS};
//! use rstest::rstest;
//!
//! #[rstest]
//! fn test_walk(#[values(TestMode::Async, TestMode::Sync)] mode: TestMode) {
//!     let conn = test_connection(mode);
//!     let mut result = execute(&conn, mode, THREE_ROWS, StatementType::Select);
//!     while result.next() {}
//! }
//! ```

use indoc::indoc;
use once_cell::sync::Lazy;
use sparqlz_core::{Binding, Connection, QueryError, QueryResult, ResultRow, StatementType};
use sparqlz_drivers::{MemoryConfig, MemoryConnection};
use tracing_subscriber::EnvFilter;

/// Select query answered with no rows
pub const EMPTY: &str = "SELECT ?u WHERE { ?u a <urn:Nothing> }";
/// Select query answered with three rows
pub const THREE_ROWS: &str = "SELECT ?u ?name WHERE { ?u <urn:name> ?name } LIMIT 3";
/// Select query answered with [`PEOPLE_COUNT`] rows
pub const PEOPLE: &str = "SELECT ?u ?name ?age WHERE { ?u a <urn:Person> }";
/// Number of rows answered for [`PEOPLE`]
pub const PEOPLE_COUNT: usize = 25;
/// Construct query answered with triples
pub const CONSTRUCT: &str = "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }";
/// Ask query answered with true
pub const ASK_TRUE: &str = "ASK { <urn:person:0> a <urn:Person> }";
/// Ask query answered with false
pub const ASK_FALSE: &str = "ASK { <urn:person:0> a <urn:Robot> }";
/// Query whose execution fails with a statement error
pub const BROKEN: &str = "SELEC ?u WHERE {";
/// Message of the error answered for [`BROKEN`]
pub const BROKEN_MESSAGE: &str = "syntax error at line 1";

/// Delivery mode under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestMode {
    /// Background population, all rows in few batches
    Async,
    /// Background population, one row per batch with a pause between batches
    AsyncSlow,
    /// Background population; size only reported once finished
    AsyncNoLiveSize,
    /// Forward-only, fetched on `next()`
    Sync,
}

impl TestMode {
    /// Whether the mode yields forward-only results
    pub fn is_forward_only(&self) -> bool {
        matches!(self, TestMode::Sync)
    }

    /// Backend configuration for the mode, written the way users write it
    pub fn config_toml(&self) -> &'static str {
        match self {
            TestMode::Async | TestMode::Sync => indoc! {"
                batch_size = 8
            "},
            TestMode::AsyncSlow => indoc! {"
                batch_size = 1
                batch_delay_ms = 2
            "},
            TestMode::AsyncNoLiveSize => indoc! {"
                batch_size = 4
                batch_delay_ms = 1

                [result]
                live_size = false
            "},
        }
    }
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

/// Install the test log subscriber once per process
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// One row of the [`PEOPLE`] answer
pub fn person(n: usize) -> ResultRow {
    ResultRow::new(vec![
        Binding::uri("u", format!("urn:person:{}", n)),
        Binding::new("name", format!("Person {}", n)).with_language("en"),
        Binding::new("age", 20 + n as i64),
    ])
}

fn triple(n: usize) -> ResultRow {
    ResultRow::new(vec![
        Binding::uri("s", format!("urn:person:{}", n)),
        Binding::uri("p", "urn:knows"),
        Binding::blank("o", format!("b{}", n)),
    ])
}

/// Create a connection for `mode` seeded with the shared dataset
pub fn test_connection(mode: TestMode) -> MemoryConnection {
    init_tracing();
    let conn = match MemoryConfig::from_toml_str(mode.config_toml()).and_then(MemoryConnection::new)
    {
        Ok(conn) => conn,
        Err(e) => panic!("fixture config for {:?} is invalid: {}", mode, e),
    };
    conn.register_rows(EMPTY, Vec::new());
    conn.register_rows(THREE_ROWS, (0..3).map(person).collect());
    conn.register_rows(PEOPLE, (0..PEOPLE_COUNT).map(person).collect());
    conn.register_rows(CONSTRUCT, (0..4).map(triple).collect());
    conn.register_ask(ASK_TRUE, true);
    conn.register_ask(ASK_FALSE, false);
    conn.register_failure(BROKEN, QueryError::statement(BROKEN_MESSAGE));
    conn
}

/// Execute `query` the way `mode` delivers results
pub fn execute(
    conn: &MemoryConnection,
    mode: TestMode,
    query: &str,
    statement_type: StatementType,
) -> Box<dyn QueryResult> {
    match mode {
        TestMode::Sync => conn.sync_execute(query, statement_type),
        TestMode::Async | TestMode::AsyncSlow | TestMode::AsyncNoLiveSize => {
            conn.begin_execution(query, statement_type)
        }
    }
}

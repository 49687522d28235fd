//! sparqlz drivers - backend implementations
//!
//! This crate provides concrete implementations of the `Connection` trait
//! defined in `sparqlz-core`, together with the runtime their background
//! producers run on.

mod config;
mod memory;
mod runtime;

pub use config::MemoryConfig;
pub use memory::{Answer, MemoryCancelHandle, MemoryConnection};
pub use runtime::{block_on_producer, producer_runtime};

/// Re-export commonly used types from sparqlz-core
pub use sparqlz_core::{
    Binding, BufferedResult, Connection, DriverCapabilities, ErrorKind, Feature, Position,
    QueryCancelHandle, QueryError, QueryResult, Result, ResultOptions, ResultRow, SparqlzError,
    StatementType, StreamingResult, Value,
};

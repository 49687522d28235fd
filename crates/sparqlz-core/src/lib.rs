//! sparqlz core - query result cursors for graph (SPARQL) backends
//!
//! This crate defines how a caller consumes the rows of an executed query,
//! independently of the backend that produces them:
//!
//! - `QueryResult` - the navigable cursor interface
//! - `BufferedResult` - random-access results populated in the background
//! - `StreamingResult` - forward-only results fetched on `next()`
//! - `Completion` / `Notifier` - completion hand-off and progress events
//! - `Connection` - the interface a backend implements to start executions
//! - Values: `Value`, `Binding`, `ResultRow`, `QueryError`

mod binding;
mod buffered;
mod completion;
mod config;
mod connection;
mod cursor;
mod error;
mod feature;
mod notify;
mod result;
mod row;
mod streaming;
mod types;

pub use binding::*;
pub use buffered::*;
pub use completion::*;
pub use config::*;
pub use connection::*;
pub use cursor::*;
pub use error::*;
pub use feature::*;
pub use notify::*;
pub use result::*;
pub use row::*;
pub use streaming::*;
pub use types::*;

//! Backend connection trait and query cancellation

use crate::{QueryResult, StatementType};
use async_trait::async_trait;
use std::sync::Arc;

/// Handle for cancelling running queries from any thread.
///
/// Cancelling drives every in-flight result of the connection to finished
/// with a [`TransactionError`](crate::ErrorKind::TransactionError). The
/// handle is idempotent: calls with nothing running are no-ops.
pub trait QueryCancelHandle: Send + Sync {
    fn cancel(&self);
}

/// Delivery disciplines a backend supports
#[derive(Debug, Clone, Default)]
pub struct DriverCapabilities {
    /// `begin_execution` populates results in the background
    pub supports_async_exec: bool,
    /// `sync_execute` returns results fetched on `next()`
    pub supports_sync_exec: bool,
    /// Buffered results report their size while still populating
    pub supports_live_size: bool,
    /// Supports query cancellation
    pub supports_cancellation: bool,
}

/// A connection to a query backend.
///
/// Results are returned immediately in their initial state; any failure to
/// execute is reported through the result's `last_error()` once finished,
/// never as a return value here.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "memory")
    fn driver_name(&self) -> &str;

    fn capabilities(&self) -> DriverCapabilities;

    /// Start executing `query` and return a random-access result that is
    /// populated in the background
    fn begin_execution(&self, query: &str, statement_type: StatementType)
        -> Box<dyn QueryResult>;

    /// Execute `query` so that each `next()` fetches the following row. The
    /// result only finishes once iterated past its last row.
    fn sync_execute(&self, query: &str, statement_type: StatementType) -> Box<dyn QueryResult>;

    /// Begin execution and resolve once the result has finished
    async fn exec_and_wait(
        &self,
        query: &str,
        statement_type: StatementType,
    ) -> Box<dyn QueryResult> {
        let result = self.begin_execution(query, statement_type);
        let completion = result.completion_handle();
        tracing::debug!(query_id = %result.id(), "awaiting result completion");
        completion.finished().await;
        result
    }

    /// Get a handle that can be used to cancel running queries.
    ///
    /// Returns `None` if the driver does not support query cancellation.
    fn cancel_handle(&self) -> Option<Arc<dyn QueryCancelHandle>> {
        None
    }
}

//! Tokio runtime for background result producers
//!
//! Asynchronous executions populate their results on this runtime so that
//! callers can block in `wait_for_finished()` on any thread, including one
//! that is itself driving a different runtime.

use std::sync::OnceLock;
use tokio::runtime::Runtime;

static PRODUCER_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or create the shared runtime for result producers.
///
/// # Panics
///
/// Panics if the runtime cannot be created.
pub fn producer_runtime() -> &'static Runtime {
    PRODUCER_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("sparqlz-producer")
            .build()
            .expect("Failed to create Tokio runtime for result producers")
    })
}

/// Run a future to completion on the producer runtime, blocking the current
/// thread. Must not be called from within an async context.
pub fn block_on_producer<F, T>(future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    producer_runtime().block_on(future)
}

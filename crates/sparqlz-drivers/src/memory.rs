//! In-memory backend serving pre-registered answers
//!
//! Queries are not parsed: each query text is looked up verbatim (ignoring
//! surrounding whitespace) in a table of registered answers. Asynchronous
//! executions replay the rows in batches on the producer runtime; synchronous
//! executions hand them out one per `next()`.

use crate::{producer_runtime, MemoryConfig};
use async_trait::async_trait;
use parking_lot::RwLock;
use sparqlz_core::{
    BufferedResult, Connection, DriverCapabilities, IterSource, Outcome, QueryCancelHandle,
    QueryError, QueryResult, Result, ResultRow, ResultWriter, RowFetch, RowSource, StatementType,
    StreamingResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What the backend returns for a registered query
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Rows of a Select, Construct or Describe query
    Rows(Vec<ResultRow>),
    /// Answer of an Ask query
    Bool(bool),
    /// Execution fails with this error
    Fail(QueryError),
}

impl Answer {
    /// Replace answers that do not fit the statement shape with a statement error
    fn for_statement(self, statement_type: StatementType) -> Self {
        match (&self, statement_type.is_bool()) {
            (Answer::Rows(_), true) => Answer::Fail(QueryError::statement(
                "ASK query registered with a row answer",
            )),
            (Answer::Bool(_), false) => Answer::Fail(QueryError::statement(format!(
                "{} query registered with a boolean answer",
                statement_type
            ))),
            _ => self,
        }
    }
}

/// Cancel handle shared by a connection and its in-flight executions.
///
/// Each execution remembers the generation it started in and aborts once
/// the generation moves on.
#[derive(Debug, Default)]
pub struct MemoryCancelHandle {
    generation: AtomicU64,
}

impl MemoryCancelHandle {
    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn is_cancelled_since(&self, generation: u64) -> bool {
        self.generation() != generation
    }
}

impl QueryCancelHandle for MemoryCancelHandle {
    fn cancel(&self) {
        tracing::debug!("cancelling in-flight memory executions");
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

fn cancelled() -> QueryError {
    QueryError::transaction("query cancelled")
}

/// Row source that stops with a cancellation error once its connection is
/// cancelled
struct CancellableSource<S> {
    inner: S,
    cancel: Arc<MemoryCancelHandle>,
    generation: u64,
}

impl<S: RowSource> RowSource for CancellableSource<S> {
    fn fetch_next(&mut self) -> RowFetch {
        if self.cancel.is_cancelled_since(self.generation) {
            return RowFetch::Failed(cancelled());
        }
        self.inner.fetch_next()
    }
}

/// Connection to an in-memory answer table
pub struct MemoryConnection {
    config: MemoryConfig,
    answers: RwLock<HashMap<String, Answer>>,
    cancel: Arc<MemoryCancelHandle>,
}

impl MemoryConnection {
    /// Open a connection. Fails if `config` does not validate.
    pub fn new(config: MemoryConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            batch_size = config.batch_size,
            batch_delay_ms = config.batch_delay_ms,
            "opening in-memory connection"
        );
        Ok(Self {
            config,
            answers: RwLock::new(HashMap::new()),
            cancel: Arc::new(MemoryCancelHandle::default()),
        })
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Register the answer for `query`, replacing any previous one
    pub fn register(&self, query: &str, answer: Answer) {
        tracing::debug!(query = %query.trim(), "registering answer");
        self.answers.write().insert(query.trim().to_string(), answer);
    }

    pub fn register_rows(&self, query: &str, rows: Vec<ResultRow>) {
        self.register(query, Answer::Rows(rows));
    }

    pub fn register_ask(&self, query: &str, value: bool) {
        self.register(query, Answer::Bool(value));
    }

    pub fn register_failure(&self, query: &str, error: QueryError) {
        self.register(query, Answer::Fail(error));
    }

    fn lookup(&self, query: &str, statement_type: StatementType) -> Answer {
        match self.answers.read().get(query.trim()) {
            Some(answer) => answer.clone().for_statement(statement_type),
            None => {
                tracing::warn!(query = %query.trim(), "no answer registered");
                Answer::Fail(QueryError::statement(format!(
                    "no answer registered for query: {}",
                    query.trim()
                )))
            }
        }
    }
}

async fn produce(
    mut writer: ResultWriter,
    answer: Answer,
    batch_size: usize,
    delay: Duration,
    cancel: Arc<MemoryCancelHandle>,
    generation: u64,
) {
    tracing::debug!(query_id = %writer.query_id(), "producer started");
    let rows = match answer {
        Answer::Fail(error) => return writer.fail(error),
        Answer::Bool(value) => {
            writer.set_bool_value(value);
            return writer.finish();
        }
        Answer::Rows(rows) => rows,
    };

    for batch in rows.chunks(batch_size) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if cancel.is_cancelled_since(generation) {
            tracing::info!(query_id = %writer.query_id(), rows = writer.row_count(), "execution cancelled");
            return writer.fail(cancelled());
        }
        writer.append_rows(batch.iter().cloned());
    }
    writer.finish();
}

#[async_trait]
impl Connection for MemoryConnection {
    fn driver_name(&self) -> &str {
        "memory"
    }

    fn capabilities(&self) -> DriverCapabilities {
        DriverCapabilities {
            supports_async_exec: true,
            supports_sync_exec: true,
            supports_live_size: self.config.result.live_size,
            supports_cancellation: true,
        }
    }

    fn begin_execution(&self, query: &str, statement_type: StatementType) -> Box<dyn QueryResult> {
        let (result, writer) =
            BufferedResult::channel(query, statement_type, self.config.result.clone());
        let answer = self.lookup(query, statement_type);
        let cancel = Arc::clone(&self.cancel);
        let generation = cancel.generation();
        producer_runtime().spawn(produce(
            writer,
            answer,
            self.config.batch_size,
            self.config.batch_delay(),
            cancel,
            generation,
        ));
        Box::new(result)
    }

    fn sync_execute(&self, query: &str, statement_type: StatementType) -> Box<dyn QueryResult> {
        let answer = self.lookup(query, statement_type);
        let cancel = Arc::clone(&self.cancel);
        let generation = cancel.generation();
        match answer {
            // a single boolean has nothing to stream; it is known immediately
            Answer::Bool(value) => Box::new(BufferedResult::completed(
                query,
                statement_type,
                Vec::new(),
                Outcome::answer(value),
            )),
            // no rows are ever fetched from an Ask result, so its failure must be
            // published up front
            Answer::Fail(error) if statement_type.is_bool() => Box::new(BufferedResult::completed(
                query,
                statement_type,
                Vec::new(),
                Outcome::failed(error),
            )),
            Answer::Rows(rows) => Box::new(StreamingResult::with_options(
                query,
                statement_type,
                CancellableSource {
                    inner: IterSource::new(rows.into_iter().map(Ok)),
                    cancel,
                    generation,
                },
                &self.config.result,
            )),
            Answer::Fail(error) => Box::new(StreamingResult::with_options(
                query,
                statement_type,
                IterSource::new(std::iter::once(Err(error))),
                &self.config.result,
            )),
        }
    }

    fn cancel_handle(&self) -> Option<Arc<dyn QueryCancelHandle>> {
        let handle: Arc<dyn QueryCancelHandle> = self.cancel.clone();
        Some(handle)
    }
}

impl std::fmt::Debug for MemoryConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConnection")
            .field("config", &self.config)
            .field("answers", &self.answers.read().len())
            .finish()
    }
}

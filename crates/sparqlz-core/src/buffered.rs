//! Random-access results populated in the background
//!
//! A [`BufferedResult`] materializes every row it receives in a shared
//! buffer. The producing side holds the paired [`ResultWriter`] and may run
//! on any thread; the consumer navigates rows that have already arrived and
//! learns about completion through the one-shot [`Completion`].

use crate::{
    Binding, Completion, Features, Notifier, Outcome, Position, QueryError, QueryResult,
    RandomAccessCursor, ResultHeader, ResultOptions, ResultRow, StatementType, Value,
};
use parking_lot::RwLock;
use std::sync::Arc;

struct Shared {
    rows: RwLock<Vec<ResultRow>>,
    completion: Arc<Completion>,
    notifier: Notifier,
}

/// Random-access result over a row buffer
pub struct BufferedResult {
    header: ResultHeader,
    features: Features,
    options: ResultOptions,
    cursor: RandomAccessCursor,
    shared: Arc<Shared>,
}

impl BufferedResult {
    /// Create an unfinished result and the writer that populates it
    pub fn channel(
        query: impl Into<String>,
        statement_type: StatementType,
        options: ResultOptions,
    ) -> (Self, ResultWriter) {
        let header = ResultHeader::new(query, statement_type);
        let shared = Arc::new(Shared {
            rows: RwLock::new(Vec::new()),
            completion: Arc::new(Completion::new()),
            notifier: Notifier::new(options.event_capacity),
        });
        tracing::debug!(
            query_id = %header.id,
            statement = %statement_type,
            "buffered result created"
        );
        let writer = ResultWriter {
            shared: Some(Arc::clone(&shared)),
            query_id: header.id,
            bool_value: false,
        };
        let result = Self {
            header,
            features: Features::QUERY_SIZE,
            options,
            cursor: RandomAccessCursor::new(),
            shared,
        };
        (result, writer)
    }

    /// Create a result that is already finished, as produced inline by a
    /// synchronous execution
    pub fn completed(
        query: impl Into<String>,
        statement_type: StatementType,
        rows: Vec<ResultRow>,
        outcome: Outcome,
    ) -> Self {
        let (mut result, mut writer) =
            Self::channel(query, statement_type, ResultOptions::default());
        result.features |= Features::SYNC;
        writer.append_rows(rows);
        writer.set_bool_value(outcome.bool_value);
        writer.complete(outcome.error);
        result
    }

    /// Number of rows received so far, regardless of `live_size`
    pub fn rows_received(&self) -> usize {
        self.shared.rows.read().len()
    }

    fn row_at(&self, index: usize) -> Option<ResultRow> {
        self.shared.rows.read().get(index).cloned()
    }
}

impl QueryResult for BufferedResult {
    fn header(&self) -> &ResultHeader {
        &self.header
    }

    fn features(&self) -> Features {
        self.features
    }

    fn pos(&self) -> Position {
        self.cursor.position()
    }

    fn next(&mut self) -> bool {
        let size = self.size();
        self.cursor.next(size)
    }

    fn previous(&mut self) -> bool {
        let size = self.size();
        self.cursor.previous(size)
    }

    fn first(&mut self) -> bool {
        let size = self.size();
        self.cursor.first(size)
    }

    fn last(&mut self) -> bool {
        let size = self.size();
        self.cursor.last(size)
    }

    fn set_pos(&mut self, pos: usize) -> bool {
        let size = self.size();
        self.cursor.set_pos(pos, size)
    }

    fn size(&self) -> Option<usize> {
        // completion is checked first: every row is appended before it is published
        if self.shared.completion.is_finished() || self.options.live_size {
            Some(self.rows_received())
        } else {
            None
        }
    }

    fn current(&self) -> ResultRow {
        self.cursor
            .position()
            .index()
            .and_then(|idx| self.row_at(idx))
            .unwrap_or_default()
    }

    fn binding(&self, index: usize) -> Option<Binding> {
        let row = self.cursor.position().index()?;
        self.shared
            .rows
            .read()
            .get(row)
            .and_then(|r| r.binding(index).cloned())
    }

    fn value(&self, index: usize) -> Option<Value> {
        let row = self.cursor.position().index()?;
        self.shared
            .rows
            .read()
            .get(row)
            .and_then(|r| r.value(index).cloned())
    }

    fn completion(&self) -> &Arc<Completion> {
        &self.shared.completion
    }

    fn notifier(&self) -> &Notifier {
        &self.shared.notifier
    }

    fn wait_for_finished(&self) {
        if !self.shared.completion.is_finished() {
            tracing::trace!(query_id = %self.header.id, "waiting for result to finish");
        }
        self.shared.completion.wait();
    }
}

impl std::fmt::Debug for BufferedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedResult")
            .field("header", &self.header)
            .field("features", &self.features)
            .field("position", &self.cursor.position())
            .field("rows", &self.rows_received())
            .field("finished", &self.shared.completion.is_finished())
            .finish()
    }
}

/// Producer side of a [`BufferedResult`].
///
/// Rows become visible to the consumer in append order. Finishing consumes
/// the writer; dropping it unfinished finishes the result with a
/// [`BackendError`](crate::ErrorKind::BackendError) so waiters are released.
pub struct ResultWriter {
    shared: Option<Arc<Shared>>,
    query_id: uuid::Uuid,
    bool_value: bool,
}

impl ResultWriter {
    pub fn append_row(&mut self, row: ResultRow) {
        self.append_rows(std::iter::once(row));
    }

    /// Append a batch of rows, emitting a single progress notification
    pub fn append_rows<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = ResultRow>,
    {
        let Some(shared) = &self.shared else {
            return;
        };
        let total_rows = {
            let mut buffer = shared.rows.write();
            let before = buffer.len();
            buffer.extend(rows);
            if buffer.len() == before {
                return;
            }
            buffer.len()
        };
        tracing::trace!(query_id = %self.query_id, total_rows, "rows appended");
        shared.notifier.data_ready(total_rows);
    }

    /// Record the answer of an Ask query, published on finish
    pub fn set_bool_value(&mut self, value: bool) {
        self.bool_value = value;
    }

    pub fn row_count(&self) -> usize {
        self.shared
            .as_ref()
            .map(|shared| shared.rows.read().len())
            .unwrap_or(0)
    }

    pub fn query_id(&self) -> uuid::Uuid {
        self.query_id
    }

    /// Mark the result finished without error
    pub fn finish(mut self) {
        self.complete(QueryError::default());
    }

    /// Mark the result finished with `error`
    pub fn fail(mut self, error: QueryError) {
        self.complete(error);
    }

    fn complete(&mut self, error: QueryError) {
        let Some(shared) = self.shared.take() else {
            return;
        };
        let rows = shared.rows.read().len();
        if error.is_valid() {
            tracing::debug!(query_id = %self.query_id, rows, error = %error, "result failed");
        } else {
            tracing::debug!(query_id = %self.query_id, rows, "result finished");
        }
        let outcome = Outcome {
            error,
            bool_value: self.bool_value,
        };
        if shared.completion.publish(outcome) {
            shared.notifier.finished();
        }
    }
}

impl Drop for ResultWriter {
    fn drop(&mut self) {
        if self.shared.is_some() {
            tracing::warn!(query_id = %self.query_id, "result writer dropped before completion");
            self.complete(QueryError::backend("producer dropped before completion"));
        }
    }
}

impl std::fmt::Debug for ResultWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultWriter")
            .field("query_id", &self.query_id)
            .field("open", &self.shared.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;

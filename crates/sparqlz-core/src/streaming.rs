//! Forward-only results fetched synchronously on `next()`
//!
//! A [`StreamingResult`] pulls one row at a time from a [`RowSource`]. It
//! keeps only the current row, cannot be rewound, and only finishes once the
//! caller has iterated past the last row.

use crate::{
    Binding, Completion, Features, ForwardCursor, Notifier, Outcome, Position, QueryError,
    QueryResult, ResultHeader, ResultOptions, ResultRow, StatementType, Value,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Outcome of one fetch from a row source
#[derive(Debug, Clone, PartialEq)]
pub enum RowFetch {
    Row(ResultRow),
    End,
    Failed(QueryError),
}

/// Supplier of rows for a streaming result. `fetch_next` may block.
pub trait RowSource: Send {
    fn fetch_next(&mut self) -> RowFetch;
}

/// Row source over an iterator
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = std::result::Result<ResultRow, QueryError>> + Send,
{
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I> RowSource for IterSource<I>
where
    I: Iterator<Item = std::result::Result<ResultRow, QueryError>> + Send,
{
    fn fetch_next(&mut self) -> RowFetch {
        match self.inner.next() {
            Some(Ok(row)) => RowFetch::Row(row),
            Some(Err(error)) => RowFetch::Failed(error),
            None => RowFetch::End,
        }
    }
}

/// Create a bounded channel whose receiving end is a row source.
///
/// The sender is meant for another thread or task. `fetch_next` on the
/// source blocks the calling thread, so the consuming result must not be
/// driven from inside an async runtime worker.
pub fn channel_source(capacity: usize) -> (RowSender, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (RowSender { tx }, ChannelSource { rx })
}

/// Producer half of [`channel_source`]
#[derive(Debug, Clone)]
pub struct RowSender {
    tx: mpsc::Sender<RowFetch>,
}

impl RowSender {
    /// Send a row, blocking while the channel is full. Returns false once
    /// the consumer has gone away.
    pub fn send_row(&self, row: ResultRow) -> bool {
        self.tx.blocking_send(RowFetch::Row(row)).is_ok()
    }

    /// Async variant of [`send_row`](RowSender::send_row)
    pub async fn send(&self, row: ResultRow) -> bool {
        self.tx.send(RowFetch::Row(row)).await.is_ok()
    }

    /// Signal the end of the rows
    pub fn finish(self) {
        let _ = self.tx.blocking_send(RowFetch::End);
    }

    /// Signal a failure; the consumer sees no further rows
    pub fn fail(self, error: QueryError) {
        let _ = self.tx.blocking_send(RowFetch::Failed(error));
    }

    pub async fn finish_async(self) {
        let _ = self.tx.send(RowFetch::End).await;
    }

    pub async fn fail_async(self, error: QueryError) {
        let _ = self.tx.send(RowFetch::Failed(error)).await;
    }
}

/// Consumer half of [`channel_source`]
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<RowFetch>,
}

impl RowSource for ChannelSource {
    fn fetch_next(&mut self) -> RowFetch {
        match self.rx.blocking_recv() {
            Some(fetch) => fetch,
            None => RowFetch::Failed(QueryError::backend("row stream closed before completion")),
        }
    }
}

/// Forward-only, synchronously fetched result
pub struct StreamingResult {
    header: ResultHeader,
    cursor: ForwardCursor,
    current: ResultRow,
    fetched: usize,
    source: Box<dyn RowSource>,
    completion: Arc<Completion>,
    notifier: Notifier,
}

impl StreamingResult {
    pub fn new(
        query: impl Into<String>,
        statement_type: StatementType,
        source: impl RowSource + 'static,
    ) -> Self {
        Self::with_options(query, statement_type, source, &ResultOptions::default())
    }

    pub fn with_options(
        query: impl Into<String>,
        statement_type: StatementType,
        source: impl RowSource + 'static,
        options: &ResultOptions,
    ) -> Self {
        let header = ResultHeader::new(query, statement_type);
        tracing::debug!(
            query_id = %header.id,
            statement = %statement_type,
            "streaming result created"
        );
        Self {
            header,
            cursor: ForwardCursor::new(),
            current: ResultRow::default(),
            fetched: 0,
            source: Box::new(source),
            completion: Arc::new(Completion::new()),
            notifier: Notifier::new(options.event_capacity),
        }
    }

    /// Rows fetched so far
    pub fn rows_fetched(&self) -> usize {
        self.fetched
    }

    fn finish(&mut self, outcome: Outcome) {
        self.current = ResultRow::default();
        self.cursor.update_pos(Position::AfterLast);
        if outcome.error.is_valid() {
            tracing::debug!(
                query_id = %self.header.id,
                rows = self.fetched,
                error = %outcome.error,
                "stream failed"
            );
        } else {
            tracing::debug!(query_id = %self.header.id, rows = self.fetched, "stream exhausted");
        }
        if self.completion.publish(outcome) {
            self.notifier.finished();
        }
    }

    fn reject(&self, operation: &str) -> bool {
        tracing::warn!(
            query_id = %self.header.id,
            operation,
            "navigation rejected on forward-only result"
        );
        false
    }
}

impl QueryResult for StreamingResult {
    fn header(&self) -> &ResultHeader {
        &self.header
    }

    fn features(&self) -> Features {
        Features::FORWARD_ONLY | Features::SYNC
    }

    fn pos(&self) -> Position {
        self.cursor.position()
    }

    fn next(&mut self) -> bool {
        let Some(target) = self.cursor.next_position() else {
            return false;
        };
        match self.source.fetch_next() {
            RowFetch::Row(row) => {
                self.current = row;
                self.fetched += 1;
                self.cursor.update_pos(target);
                self.notifier.data_ready(self.fetched);
                true
            }
            RowFetch::End => {
                self.finish(Outcome::success());
                false
            }
            RowFetch::Failed(error) => {
                self.finish(Outcome::failed(error));
                false
            }
        }
    }

    fn previous(&mut self) -> bool {
        self.reject("previous")
    }

    fn first(&mut self) -> bool {
        if self.cursor.position() == Position::At(0) {
            return true;
        }
        if self.cursor.first_is_next() {
            return self.next();
        }
        self.reject("first")
    }

    fn last(&mut self) -> bool {
        self.reject("last")
    }

    // Even `set_pos(pos + 1)` is refused: running off the end would land on
    // AfterLast rather than `pos`, breaking "true means pos() == requested".
    fn set_pos(&mut self, _pos: usize) -> bool {
        self.reject("set_pos")
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn current(&self) -> ResultRow {
        if self.cursor.position().is_valid() {
            self.current.clone()
        } else {
            ResultRow::default()
        }
    }

    fn binding(&self, index: usize) -> Option<Binding> {
        if !self.cursor.position().is_valid() {
            return None;
        }
        self.current.binding(index).cloned()
    }

    fn value(&self, index: usize) -> Option<Value> {
        if !self.cursor.position().is_valid() {
            return None;
        }
        self.current.value(index).cloned()
    }

    fn completion(&self) -> &Arc<Completion> {
        &self.completion
    }

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Rows are fetched by `next()`, so there is nothing to wait for
    fn wait_for_finished(&self) {}

    fn wait_for_finished_timeout(&self, _timeout: Duration) -> crate::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for StreamingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResult")
            .field("header", &self.header)
            .field("position", &self.cursor.position())
            .field("fetched", &self.fetched)
            .field("finished", &self.completion.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests;

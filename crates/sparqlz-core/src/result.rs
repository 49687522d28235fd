//! The consumer-facing query result interface

use crate::{
    Binding, Completion, CompletionHandle, Feature, Features, Notifier, Position, QueryError,
    Result, ResultEvent, ResultObserver, ResultRow, SparqlzError, StatementType, Subscription,
    Value,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Identity of an executed statement, fixed when execution begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultHeader {
    /// Unique result ID, used to correlate log lines
    pub id: Uuid,
    /// Query text, for diagnostics only
    pub query: String,
    pub statement_type: StatementType,
}

impl ResultHeader {
    pub fn new(query: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            statement_type,
        }
    }
}

/// A navigable handle over the rows of an executed query.
///
/// Results start positioned before the first row and unfinished. Navigation
/// and data access never block and never fail with an error: a navigation
/// call that cannot be honoured returns false and leaves the position where
/// it was (apart from running off either end with `next`/`previous`), and
/// data access on an invalid position returns an empty row or `None`.
///
/// Execution errors and the Ask answer are only available once
/// [`is_finished`](QueryResult::is_finished) returns true. Before that,
/// `has_error()` is false and `last_error()` returns a no-error value
/// whatever the producer has recorded.
///
/// A result is read by one consumer at a time.
pub trait QueryResult: Send {
    fn header(&self) -> &ResultHeader;

    /// Capabilities of this result. Callers must test these before relying
    /// on `size()` or backward navigation.
    fn features(&self) -> Features;

    /// Current cursor position
    fn pos(&self) -> Position;

    /// Move to the next row. Returns true if the cursor is on a row afterwards.
    fn next(&mut self) -> bool;

    fn previous(&mut self) -> bool;

    fn first(&mut self) -> bool;

    fn last(&mut self) -> bool;

    /// Move to the zero-based row `pos`
    fn set_pos(&mut self, pos: usize) -> bool;

    /// Number of rows, if known. Once known it never shrinks.
    fn size(&self) -> Option<usize>;

    /// The row at the current position, or an empty row
    fn current(&self) -> ResultRow;

    /// Binding `index` of the current row
    fn binding(&self, index: usize) -> Option<Binding>;

    /// Value of binding `index` of the current row
    fn value(&self, index: usize) -> Option<Value>;

    fn completion(&self) -> &Arc<Completion>;

    fn notifier(&self) -> &Notifier;

    /// Block until the result has finished. A no-op for synchronous results,
    /// and safe to call repeatedly.
    ///
    /// Must not be called on the thread that is producing the rows.
    fn wait_for_finished(&self);

    /// Like [`wait_for_finished`](QueryResult::wait_for_finished) but gives up
    /// after `timeout`, leaving the result untouched.
    fn wait_for_finished_timeout(&self, timeout: Duration) -> Result<()> {
        if self.completion().wait_timeout(timeout) {
            Ok(())
        } else {
            Err(SparqlzError::Timeout(format!(
                "result {} not finished after {:?}",
                self.header().id,
                timeout
            )))
        }
    }

    fn id(&self) -> Uuid {
        self.header().id
    }

    /// The executed query text
    fn query(&self) -> &str {
        &self.header().query
    }

    fn statement_type(&self) -> StatementType {
        self.header().statement_type
    }

    fn is_table(&self) -> bool {
        self.statement_type().is_table()
    }

    fn is_graph(&self) -> bool {
        self.statement_type().is_graph()
    }

    fn is_bool(&self) -> bool {
        self.statement_type().is_bool()
    }

    fn has_feature(&self, feature: Feature) -> bool {
        self.features().has(feature)
    }

    /// True when positioned on a row
    fn is_valid(&self) -> bool {
        self.pos().is_valid()
    }

    /// Value of binding `index` as a string, ignoring its type. Empty when
    /// there is no such value.
    fn string_value(&self, index: usize) -> String {
        self.value(index).map(|v| v.to_string()).unwrap_or_default()
    }

    fn is_finished(&self) -> bool {
        self.completion().is_finished()
    }

    fn completion_handle(&self) -> CompletionHandle {
        CompletionHandle::new(Arc::clone(self.completion()))
    }

    /// True if the result has finished and execution failed
    fn has_error(&self) -> bool {
        self.completion()
            .outcome()
            .is_some_and(|outcome| outcome.error.is_valid())
    }

    /// The execution error, once finished
    fn last_error(&self) -> QueryError {
        self.completion()
            .outcome()
            .map(|outcome| outcome.error.clone())
            .unwrap_or_default()
    }

    /// Answer of an Ask query. Only meaningful once finished.
    fn bool_value(&self) -> bool {
        match self.completion().outcome() {
            Some(outcome) => outcome.bool_value,
            None => {
                tracing::warn!(
                    query_id = %self.id(),
                    "bool_value() read before the result finished"
                );
                false
            }
        }
    }

    fn subscribe(&self, observer: Arc<dyn ResultObserver>) -> Subscription {
        self.notifier().subscribe(observer)
    }

    fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.notifier().unsubscribe(subscription)
    }

    /// Receiver of progress and completion events emitted from now on
    fn events(&self) -> broadcast::Receiver<ResultEvent> {
        self.notifier().events()
    }

    /// Wait for completion, then collect every row after the current
    /// position. Fails with the execution error if the result failed.
    fn collect_rows(&mut self) -> Result<Vec<ResultRow>> {
        if !self.statement_type().produces_rows() {
            return Err(SparqlzError::NotSupported(format!(
                "{} results have no rows",
                self.statement_type()
            )));
        }
        self.wait_for_finished();
        let mut rows = Vec::new();
        while self.next() {
            rows.push(self.current());
        }
        if self.has_error() {
            return Err(self.last_error().into());
        }
        Ok(rows)
    }

    /// Wait for completion and return the answer of an Ask query
    fn ask(&mut self) -> Result<bool> {
        if !self.is_bool() {
            return Err(SparqlzError::NotSupported(format!(
                "{} results have no boolean answer",
                self.statement_type()
            )));
        }
        self.wait_for_finished();
        if self.has_error() {
            return Err(self.last_error().into());
        }
        Ok(self.bool_value())
    }
}

//! Tests for StreamingResult

use super::*;
use crate::{Binding, ErrorKind, Feature, ResultEvent};
use std::thread;

fn row(n: i64) -> ResultRow {
    ResultRow::new(vec![Binding::new("n", n)])
}

fn stream_of(count: i64) -> StreamingResult {
    StreamingResult::new(
        "SELECT ?n {}",
        StatementType::Select,
        IterSource::new((0..count).map(|n| Ok(row(n)))),
    )
}

#[test]
fn test_features() {
    let result = stream_of(1);
    assert!(result.has_feature(Feature::ForwardOnly));
    assert!(result.has_feature(Feature::Sync));
    assert!(!result.has_feature(Feature::QuerySize));
    assert_eq!(result.size(), None);
}

#[test]
fn test_finished_only_after_iterating_past_the_end() {
    let mut result = stream_of(2);
    assert!(!result.is_finished());
    assert!(result.next());
    assert_eq!(result.pos(), Position::At(0));
    assert!(result.next());
    assert_eq!(result.pos(), Position::At(1));
    assert_eq!(result.value(0), Some(Value::Integer(1)));
    assert!(!result.is_finished());

    assert!(!result.next());
    assert_eq!(result.pos(), Position::AfterLast);
    assert!(result.is_finished());
    assert!(!result.has_error());
    assert_eq!(result.current(), ResultRow::default());

    assert!(!result.next());
    assert_eq!(result.rows_fetched(), 2);
}

#[test]
fn test_backward_and_random_moves_rejected_without_side_effects() {
    let mut result = stream_of(2);
    assert!(!result.last());
    assert_eq!(result.pos(), Position::BeforeFirst);

    assert!(result.next());
    let before = result.current();
    assert!(!result.previous());
    assert!(!result.last());
    assert!(!result.set_pos(1));
    assert!(!result.set_pos(0));
    assert_eq!(result.pos(), Position::At(0));
    assert_eq!(result.current(), before);
    assert_eq!(result.rows_fetched(), 1);
}

#[test]
fn test_first_acts_as_next_only_before_iteration() {
    let mut result = stream_of(3);
    assert!(result.first());
    assert_eq!(result.pos(), Position::At(0));
    // already on the first row
    assert!(result.first());
    assert_eq!(result.rows_fetched(), 1);

    assert!(result.next());
    assert!(!result.first());
    assert_eq!(result.pos(), Position::At(1));
}

#[test]
fn test_first_on_empty_stream() {
    let mut result = stream_of(0);
    assert!(!result.first());
    assert_eq!(result.pos(), Position::AfterLast);
    assert!(result.is_finished());
}

#[test]
fn test_source_failure_ends_stream_with_error() {
    let rows = vec![
        Ok(row(0)),
        Err(QueryError::transaction("cursor expired")),
        Ok(row(2)),
    ];
    let mut result = StreamingResult::new("SELECT ?n {}", StatementType::Select, IterSource::new(rows.into_iter()));
    assert!(result.next());
    assert!(!result.has_error());
    assert!(!result.next());
    assert!(result.is_finished());
    assert!(result.has_error());
    assert_eq!(result.last_error().kind(), ErrorKind::TransactionError);
    assert!(!result.next());
}

#[test]
fn test_collect_rows_drains_stream() {
    let mut result = stream_of(4);
    let rows = result.collect_rows().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3], row(3));
    assert!(result.is_finished());
}

#[test]
fn test_wait_for_finished_is_a_no_op() {
    let result = stream_of(1);
    result.wait_for_finished();
    assert!(result.wait_for_finished_timeout(Duration::from_millis(1)).is_ok());
    assert!(!result.is_finished());
}

#[test]
fn test_progress_counts_fetched_rows() {
    let mut result = stream_of(2);
    let mut events = result.events();
    while result.next() {}
    assert_eq!(events.try_recv().unwrap(), ResultEvent::DataReady { total_rows: 1 });
    assert_eq!(events.try_recv().unwrap(), ResultEvent::DataReady { total_rows: 2 });
    assert_eq!(events.try_recv().unwrap(), ResultEvent::Finished);
}

#[test]
fn test_channel_source_blocks_until_producer_sends() {
    let (sender, source) = channel_source(1);
    let producer = thread::spawn(move || {
        for n in 0..3 {
            assert!(sender.send_row(row(n)));
        }
        sender.finish();
    });
    let mut result = StreamingResult::new("SELECT ?n {}", StatementType::Select, source);
    let mut seen = Vec::new();
    while result.next() {
        seen.push(result.value(0).and_then(|v| v.as_i64()));
    }
    assert_eq!(seen, vec![Some(0), Some(1), Some(2)]);
    assert!(result.is_finished());
    assert!(!result.has_error());
    producer.join().unwrap();
}

#[test]
fn test_channel_closed_without_end_is_an_error() {
    let (sender, source) = channel_source(4);
    assert!(sender.send_row(row(0)));
    drop(sender);
    let mut result = StreamingResult::new("SELECT ?n {}", StatementType::Select, source);
    assert!(result.next());
    assert!(!result.next());
    assert!(result.has_error());
    assert_eq!(result.last_error().kind(), ErrorKind::BackendError);
}

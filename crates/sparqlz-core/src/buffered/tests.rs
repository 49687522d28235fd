//! Tests for BufferedResult

use super::*;
use crate::{Binding, ErrorKind, Feature, ResultEvent};
use pretty_assertions::assert_eq;
use std::thread;
use std::time::Duration;

fn row(n: i64) -> ResultRow {
    ResultRow::new(vec![
        Binding::uri("s", format!("http://example.org/item/{}", n)),
        Binding::new("n", n),
    ])
}

fn finished_select(count: i64) -> BufferedResult {
    BufferedResult::completed(
        "SELECT ?s ?n WHERE { ?s <urn:n> ?n }",
        StatementType::Select,
        (0..count).map(row).collect(),
        Outcome::success(),
    )
}

#[test]
fn test_initial_state() {
    let (result, _writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    assert_eq!(result.pos(), Position::BeforeFirst);
    assert!(!result.is_finished());
    assert!(!result.has_error());
    assert!(result.has_feature(Feature::QuerySize));
    assert!(!result.has_feature(Feature::ForwardOnly));
    assert!(!result.has_feature(Feature::Sync));
    assert_eq!(result.current(), ResultRow::default());
}

#[test]
fn test_three_row_walk() {
    let mut result = finished_select(3);
    assert!(result.has_feature(Feature::Sync));
    assert_eq!(
        (0..4).map(|_| result.next()).collect::<Vec<_>>(),
        vec![true, true, true, false]
    );
    assert_eq!(result.pos(), Position::AfterLast);
    assert!(result.previous());
    assert_eq!(result.pos(), Position::At(2));
    assert_eq!(result.value(1), Some(Value::Integer(2)));
    assert_eq!(result.string_value(1), "2");
}

#[test]
fn test_empty_select() {
    let mut result = finished_select(0);
    assert_eq!(result.size(), Some(0));
    assert!(!result.next());
    assert_eq!(result.pos(), Position::AfterLast);
    assert!(!result.has_error());
}

#[test]
fn test_data_access_on_invalid_position_is_empty() {
    let mut result = finished_select(2);
    assert_eq!(result.value(0), None);
    assert_eq!(result.binding(0), None);
    assert_eq!(result.string_value(0), "");

    assert!(result.set_pos(1));
    assert_eq!(result.value(7), None);
    assert_eq!(result.string_value(7), "");
    assert!(result.binding(0).is_some_and(|b| b.name() == "s"));
}

#[test]
fn test_error_hidden_until_finished() {
    let (result, mut writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    writer.append_row(row(0));
    assert!(!result.has_error());
    assert!(!result.last_error().is_valid());

    writer.fail(QueryError::transaction("store went away"));
    assert!(result.is_finished());
    assert!(result.has_error());
    assert_eq!(result.last_error().kind(), ErrorKind::TransactionError);
}

#[test]
fn test_rows_visible_as_they_arrive_with_live_size() {
    let (mut result, mut writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    assert_eq!(result.size(), Some(0));
    writer.append_rows(vec![row(0), row(1)]);
    assert_eq!(result.size(), Some(2));
    assert!(result.next());
    assert!(result.next());
    assert!(!result.next());
    assert_eq!(result.pos(), Position::AfterLast);

    writer.append_row(row(2));
    assert!(result.previous());
    assert_eq!(result.pos(), Position::At(2));
    writer.finish();
}

#[test]
fn test_size_unknown_until_finished_without_live_size() {
    let options = ResultOptions::default().with_live_size(false);
    let (mut result, mut writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, options);
    writer.append_rows(vec![row(0), row(1)]);
    assert_eq!(result.size(), None);
    assert!(!result.next());
    assert!(!result.last());
    assert_eq!(result.pos(), Position::BeforeFirst);

    writer.finish();
    assert_eq!(result.size(), Some(2));
    assert!(result.last());
    assert_eq!(result.pos(), Position::At(1));
}

#[test]
fn test_wait_for_finished_across_threads() {
    let (mut result, mut writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    let producer = thread::spawn(move || {
        for n in 0..5 {
            writer.append_row(row(n));
            thread::sleep(Duration::from_millis(2));
        }
        writer.finish();
    });
    result.wait_for_finished();
    result.wait_for_finished();
    assert!(result.is_finished());
    assert_eq!(result.size(), Some(5));
    let rows = result.collect_rows().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4], row(4));
    producer.join().unwrap();
}

#[test]
fn test_wait_timeout_leaves_result_untouched() {
    let (result, _writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    let err = result
        .wait_for_finished_timeout(Duration::from_millis(5))
        .unwrap_err();
    assert!(matches!(err, crate::SparqlzError::Timeout(_)));
    assert!(!result.is_finished());
    assert_eq!(result.pos(), Position::BeforeFirst);
}

#[test]
fn test_dropped_writer_finishes_with_backend_error() {
    let (result, writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    drop(writer);
    result.wait_for_finished();
    assert!(result.has_error());
    assert_eq!(result.last_error().kind(), ErrorKind::BackendError);
}

#[test]
fn test_ask_answer_published_on_finish() {
    let (mut result, mut writer) =
        BufferedResult::channel("ASK { ?s ?p ?o }", StatementType::Ask, ResultOptions::default());
    writer.set_bool_value(true);
    assert!(!result.bool_value());
    writer.finish();

    assert!(result.is_bool());
    assert!(!result.is_table());
    assert!(!result.is_graph());
    assert!(result.bool_value());
    assert!(result.ask().unwrap());
    assert!(result.collect_rows().is_err());
}

#[test]
fn test_failed_collect_reports_error() {
    let mut result = BufferedResult::completed(
        "SELECT broken",
        StatementType::Select,
        Vec::new(),
        Outcome::failed(QueryError::statement("parse error")),
    );
    match result.collect_rows() {
        Err(crate::SparqlzError::Query(err)) => assert_eq!(err.kind(), ErrorKind::StatementError),
        other => panic!("expected query error, got {:?}", other),
    }
}

#[test]
fn test_progress_events() {
    let (result, mut writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    let mut events = result.events();
    writer.append_rows(vec![row(0), row(1)]);
    writer.append_rows(Vec::new());
    writer.append_row(row(2));
    writer.finish();

    assert_eq!(events.try_recv().unwrap(), ResultEvent::DataReady { total_rows: 2 });
    assert_eq!(events.try_recv().unwrap(), ResultEvent::DataReady { total_rows: 3 });
    assert_eq!(events.try_recv().unwrap(), ResultEvent::Finished);
}

#[tokio::test]
async fn test_completion_handle_awaits_background_producer() {
    let (result, mut writer) =
        BufferedResult::channel("SELECT * {}", StatementType::Select, ResultOptions::default());
    let handle = result.completion_handle();
    tokio::task::spawn_blocking(move || {
        writer.append_row(row(0));
        writer.finish();
    });
    handle.finished().await;
    assert!(result.is_finished());
    assert_eq!(result.size(), Some(1));
}

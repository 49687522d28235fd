//! Cursor navigation tests across every delivery mode.
//!
//! Random-access modes are waited on before navigating, the way callers are
//! expected to use them. Forward-only behaviour beyond plain iteration lives
//! in `forward_only_tests`.
//!
//! Test categories:
//! - Initial state
//! - Full forward iteration
//! - Empty results
//! - Backward navigation and jumps (random access only)
//! - Data access on invalid positions

use crate::fixtures::{
    execute, person, test_connection, TestMode, EMPTY, PEOPLE, PEOPLE_COUNT, THREE_ROWS,
};
use anyhow::Result;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sparqlz_core::{Feature, Position, QueryResult, ResultRow, StatementType, Value};

fn people(mode: TestMode) -> Box<dyn QueryResult> {
    let conn = test_connection(mode);
    let result = execute(&conn, mode, PEOPLE, StatementType::Select);
    result.wait_for_finished();
    result
}

/// Test that a fresh result sits before the first row with nothing readable
#[rstest]
fn test_initial_state(
    #[values(TestMode::Async, TestMode::AsyncSlow, TestMode::AsyncNoLiveSize, TestMode::Sync)]
    mode: TestMode,
) {
    let conn = test_connection(mode);
    let result = execute(&conn, mode, THREE_ROWS, StatementType::Select);

    assert_eq!(result.pos(), Position::BeforeFirst);
    assert!(!result.is_valid());
    assert!(result.current().is_empty());
    assert_eq!(result.binding(0), None);
    assert_eq!(result.value(0), None);
    assert_eq!(result.string_value(0), "");
    assert_eq!(result.query(), THREE_ROWS);
}

/// Test that iterating with next() visits every row in order, then runs off the end
#[rstest]
fn test_next_visits_every_row(
    #[values(TestMode::Async, TestMode::AsyncSlow, TestMode::AsyncNoLiveSize, TestMode::Sync)]
    mode: TestMode,
) {
    let mut result = people(mode);

    let mut seen = 0;
    while result.next() {
        assert_eq!(result.pos(), Position::At(seen));
        assert_eq!(result.current(), person(seen));
        seen += 1;
    }

    assert_eq!(seen, PEOPLE_COUNT);
    assert_eq!(result.pos(), Position::AfterLast);
    assert!(!result.is_valid());
    assert!(!result.next());
    assert_eq!(result.pos(), Position::AfterLast);
    assert!(result.is_finished());
    assert!(!result.has_error());
}

/// Test that an empty result goes straight to AfterLast
#[rstest]
fn test_empty_result(
    #[values(TestMode::Async, TestMode::AsyncNoLiveSize, TestMode::Sync)] mode: TestMode,
) {
    let conn = test_connection(mode);
    let mut result = execute(&conn, mode, EMPTY, StatementType::Select);
    result.wait_for_finished();

    assert!(!result.next());
    assert_eq!(result.pos(), Position::AfterLast);
    assert!(result.current().is_empty());
    assert!(result.is_finished());
    assert!(!result.has_error());
}

/// Test random-access size reporting once finished
#[rstest]
fn test_size_after_finish(
    #[values(TestMode::Async, TestMode::AsyncSlow, TestMode::AsyncNoLiveSize)] mode: TestMode,
) {
    let result = people(mode);
    assert!(result.has_feature(Feature::QuerySize));
    assert_eq!(result.size(), Some(PEOPLE_COUNT));
}

/// Test that previous() walks back and runs off the start
#[rstest]
fn test_previous_walks_back(
    #[values(TestMode::Async, TestMode::AsyncSlow, TestMode::AsyncNoLiveSize)] mode: TestMode,
) {
    let mut result = people(mode);

    assert!(!result.previous());
    assert_eq!(result.pos(), Position::BeforeFirst);

    assert!(result.set_pos(2));
    assert!(result.previous());
    assert_eq!(result.pos(), Position::At(1));
    assert!(result.previous());
    assert_eq!(result.pos(), Position::At(0));
    assert!(!result.previous());
    assert_eq!(result.pos(), Position::BeforeFirst);
}

/// Test that previous() from AfterLast lands on the last row
#[rstest]
fn test_previous_from_after_last(#[values(TestMode::Async, TestMode::AsyncSlow)] mode: TestMode) {
    let mut result = people(mode);
    while result.next() {}

    assert!(result.previous());
    assert_eq!(result.pos(), Position::At(PEOPLE_COUNT - 1));
    assert_eq!(result.current(), person(PEOPLE_COUNT - 1));
}

/// Test first(), last() and set_pos() jumps
#[rstest]
#[case::first_row(0)]
#[case::middle_row(12)]
#[case::last_row(PEOPLE_COUNT - 1)]
fn test_set_pos_in_range(
    #[values(TestMode::Async, TestMode::AsyncNoLiveSize)] mode: TestMode,
    #[case] target: usize,
) {
    let mut result = people(mode);

    assert!(result.set_pos(target));
    assert_eq!(result.pos(), Position::At(target));
    assert_eq!(result.current(), person(target));

    assert!(result.first());
    assert_eq!(result.pos(), Position::At(0));
    assert!(result.first());

    assert!(result.last());
    assert_eq!(result.pos(), Position::At(PEOPLE_COUNT - 1));
}

/// Test that an out-of-range set_pos() fails and leaves the cursor alone
#[rstest]
#[case::one_past_end(PEOPLE_COUNT)]
#[case::far_past_end(PEOPLE_COUNT * 10)]
fn test_set_pos_out_of_range(#[case] target: usize) {
    let mut result = people(TestMode::Async);
    assert!(result.set_pos(3));

    assert!(!result.set_pos(target));
    assert_eq!(result.pos(), Position::At(3));
}

/// Test that first() and last() fail on an empty finished result
#[rstest]
fn test_first_last_on_empty(#[values(TestMode::Async, TestMode::AsyncNoLiveSize)] mode: TestMode) {
    let conn = test_connection(mode);
    let mut result = execute(&conn, mode, EMPTY, StatementType::Select);
    result.wait_for_finished();

    assert!(!result.first());
    assert!(!result.last());
    assert!(!result.set_pos(0));
    assert_eq!(result.pos(), Position::BeforeFirst);
}

/// Test typed value access on the current row
#[rstest]
fn test_value_access(
    #[values(TestMode::Async, TestMode::AsyncSlow, TestMode::AsyncNoLiveSize, TestMode::Sync)]
    mode: TestMode,
) -> Result<()> {
    let mut result = people(mode);
    assert!(result.next());
    assert!(result.next());

    assert_eq!(result.value(0), Some(Value::Uri("urn:person:1".into())));
    assert_eq!(result.string_value(1), "Person 1");
    assert_eq!(result.value(2).and_then(|v| v.as_i64()), Some(21));
    assert_eq!(result.value(3), None);
    assert_eq!(result.string_value(3), "");

    let name = result
        .binding(1)
        .ok_or_else(|| anyhow::anyhow!("missing name binding"))?;
    assert_eq!(name.name(), "name");
    assert_eq!(name.language_tag(), Some("en"));

    let row: ResultRow = result.current();
    assert_eq!(row.binding_names(), vec!["u", "name", "age"]);
    assert_eq!(row.value_by_name("age"), Some(&Value::Integer(21)));
    Ok(())
}

/// Test that a random-access result can be read twice through
#[rstest]
fn test_rewind_and_reread(#[values(TestMode::Async, TestMode::AsyncSlow)] mode: TestMode) {
    let mut result = people(mode);
    let mut first_pass = Vec::new();
    while result.next() {
        first_pass.push(result.current());
    }

    assert!(result.first());
    let mut second_pass = vec![result.current()];
    while result.next() {
        second_pass.push(result.current());
    }

    assert_eq!(first_pass, second_pass);
}

/// Test collect_rows() from the initial position
#[rstest]
fn test_collect_rows(
    #[values(TestMode::Async, TestMode::AsyncSlow, TestMode::AsyncNoLiveSize, TestMode::Sync)]
    mode: TestMode,
) -> Result<()> {
    let conn = test_connection(mode);
    let mut result = execute(&conn, mode, THREE_ROWS, StatementType::Select);

    let rows = result.collect_rows()?;
    assert_eq!(rows, (0..3).map(person).collect::<Vec<_>>());
    assert_eq!(result.pos(), Position::AfterLast);
    Ok(())
}

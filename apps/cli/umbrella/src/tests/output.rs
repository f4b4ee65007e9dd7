use crate::error::AppError;
use crate::output::JsonLinesSink;

use connector_core::ResponseSink;

use models::{AccountDeleteOutput, ObjectKey};

use std::io::{self, Write};

use serde_json::{Value, json};

/// Writer that fails every write.
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn given_records_when_sent_then_one_json_object_per_line() {
    // GIVEN
    let mut sink = JsonLinesSink::new(Vec::new());

    // WHEN
    sink.send(json!({"key": ObjectKey::simple("1")}));
    sink.send(AccountDeleteOutput::default());

    // THEN
    assert_eq!(sink.written(), 2);
    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines, vec![json!({"key": {"simple": {"id": "1"}}}), json!({})]);
}

/// **VALUE**: Verifies a write failure surfaces from `finish` instead of vanishing.
///
/// **BUG THIS CATCHES**: Would catch `send` swallowing io errors, which would make
/// `umbrella list-accounts | head` report success with missing records.
#[test]
fn given_failing_writer_when_finishing_then_output_error() {
    // GIVEN
    let mut sink = JsonLinesSink::new(BrokenPipe);

    // WHEN
    sink.send(AccountDeleteOutput::default());
    sink.send(AccountDeleteOutput::default());
    let result = sink.finish();

    // THEN
    match result {
        Err(AppError::Output { message, .. }) => assert!(message.contains("pipe closed")),
        other => panic!("expected output error, got: {other:?}"),
    }
}

#[test]
fn given_no_records_when_finishing_then_zero_written() {
    let sink = JsonLinesSink::new(Vec::new());

    assert_eq!(sink.finish().unwrap(), 0);
}

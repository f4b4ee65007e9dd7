//! JSON-lines output for handler results.

use crate::error::AppError;

use common::ErrorLocation;

use connector_core::ResponseSink;

use std::io::Write;
use std::panic::Location;

use serde::Serialize;

/// Writes every record as one line of JSON.
///
/// `ResponseSink::send` cannot fail, so the first write error is kept and
/// reported by `finish`; records after it are dropped.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
    failure: Option<String>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failure: None,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the number of records written.
    #[track_caller]
    pub fn finish(mut self) -> Result<usize, AppError> {
        if self.failure.is_none() {
            if let Err(e) = self.writer.flush() {
                self.failure = Some(format!("Failed to flush output: {e}"));
            }
        }

        match self.failure {
            Some(message) => Err(AppError::Output {
                message,
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(self.written),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<(), String> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| format!("Failed to serialize record: {e}"))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| format!("Failed to write output: {e}"))
    }
}

impl<W: Write, T: Serialize> ResponseSink<T> for JsonLinesSink<W> {
    fn send(&mut self, output: T) {
        if self.failure.is_some() {
            return;
        }

        match self.write_record(&output) {
            Ok(()) => self.written += 1,
            Err(message) => self.failure = Some(message),
        }
    }
}

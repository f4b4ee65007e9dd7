//! Output side of every connector operation.

/// Receives the records an operation produces, one at a time.
///
/// Operations may push zero or more records before returning. A record that
/// has been sent stays sent even if the operation fails afterwards.
pub trait ResponseSink<T> {
    fn send(&mut self, output: T);
}

impl<T> ResponseSink<T> for Vec<T> {
    fn send(&mut self, output: T) {
        self.push(output);
    }
}

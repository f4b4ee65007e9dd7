use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every connector error carries an ErrorLocation. If capture
/// breaks, every error message loses the pointer to where it was raised.
///
/// **BUG THIS CATCHES**: Would catch if file path or line capture stops working.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: Creating ErrorLocation from the current position
    let (location, expected_line) = (ErrorLocation::from(Location::caller()), line!());

    // THEN: Should capture file, line, and column
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line, expected_line, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the bracketed `[file:line:column]` Display format.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops brackets or fields,
/// which would make every error message in the workspace harder to read.
#[test]
fn given_error_location_when_displayed_then_uses_bracketed_format() {
    // GIVEN: A fixed location
    let location = ErrorLocation {
        file: "client.rs",
        line: 42,
        column: 7,
    };

    // WHEN: Formatting
    let rendered = location.to_string();

    // THEN: Should be [file:line:column]
    assert_eq!(rendered, "[client.rs:42:7]");
}

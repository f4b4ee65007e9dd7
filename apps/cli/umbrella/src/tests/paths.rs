use crate::handlers::ConfigSource;
use crate::paths::{APP_DIR_NAME, CONFIG_FILE_NAME, resolve_with_default};

use std::path::Path;

#[test]
fn given_explicit_path_when_resolving_then_file_source_even_if_missing() {
    // GIVEN: An explicit path that doesn't exist
    let explicit = Path::new("/nonexistent/umbrella.json");

    // WHEN
    let source = resolve_with_default(Some(explicit), None);

    // THEN: Explicit wins; a missing file is reported later, on load
    assert_eq!(source, ConfigSource::File(explicit.to_path_buf()));
}

#[test]
fn given_existing_default_file_when_resolving_then_default_used() {
    // GIVEN
    let dir = tempfile::tempdir().unwrap();
    let default_path = dir.path().join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
    std::fs::create_dir_all(default_path.parent().unwrap()).unwrap();
    std::fs::write(&default_path, "{}").unwrap();

    // WHEN
    let source = resolve_with_default(None, Some(default_path.clone()));

    // THEN
    assert_eq!(source, ConfigSource::File(default_path));
}

#[test]
fn given_missing_default_file_when_resolving_then_environment() {
    let dir = tempfile::tempdir().unwrap();

    let source = resolve_with_default(None, Some(dir.path().join(CONFIG_FILE_NAME)));

    assert_eq!(source, ConfigSource::Environment);
}

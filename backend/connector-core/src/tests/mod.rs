mod classifier;
mod connector_error;
mod raw_failure;

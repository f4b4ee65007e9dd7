// Library exports for testing
// The binary (main.rs) imports these as well

pub mod cli;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod output;
pub mod paths;

#[cfg(test)]
mod tests;

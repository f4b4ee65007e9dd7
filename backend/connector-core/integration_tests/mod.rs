mod helpers;

mod client;
mod config;
mod connector;
mod error;

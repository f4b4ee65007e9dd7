mod cli;
mod handlers;
mod output;
mod paths;

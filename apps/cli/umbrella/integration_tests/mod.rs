mod helpers;

mod commands;
mod environment;

//! Terminal front-end for notez. See [`commands`] for the dispatch layer.

mod commands;
mod print;
mod setup;
mod shell;

pub use commands::run;

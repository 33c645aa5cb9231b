//! Command-line interface

pub mod args;
pub mod commands;
pub mod signal;

pub use args::{Cli, Commands, CompletionsArgs};
pub use signal::cancel_on_signal;

//! Utilities (child process execution).

pub mod command;

pub use command::{status_with_timeout, Finished};

//! sw-cli: Command-line interface for snapwatch
//!
//! Provides the `snapwatch` monitoring plugin: option parsing, logging
//! setup, and the single status line printed on stdout.

pub mod args;
pub mod logging;
pub mod output;

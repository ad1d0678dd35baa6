//! Live process table for the terminal.
//!
//! [`system`] samples counters and per-process state into an immutable
//! [`system::Snapshot`] each cycle and ranks it; the remaining modules are
//! the interactive shell around it.

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod logging;
pub mod system;
pub mod ui;

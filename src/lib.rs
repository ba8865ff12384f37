//! Ripforge - rip Blu-ray titles with MakeMKV and encode them with HandBrakeCLI
//!
//! This library crate exposes the core functionality for integration testing.

pub mod app;
pub mod batch;
pub mod config;
pub mod drives;
pub mod output;
pub mod progress;
pub mod session;
pub mod task;
pub mod tui;
pub mod wake;

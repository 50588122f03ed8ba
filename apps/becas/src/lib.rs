//! # becas
//!
//! HTTP server, CLI and configuration for the Becas content catalog.
//! The binary in `main.rs` is a thin wrapper over this library so the
//! router and configuration can be exercised from integration tests.

pub mod api;
pub mod cli;
pub mod config;

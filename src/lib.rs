//! recipebox library
//!
//! The recipe data layer: query keys, the two-tier cache, the API client and
//! the query orchestrator, plus CLI and configuration parsing. The terminal
//! UI in the binary is built on top of it.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod query;

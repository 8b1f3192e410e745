//! Tidio MCP server
//!
//! Maps four named tools onto the bridge crates and formats
//! human-readable results for the calling assistant.

pub mod handler;

pub use handler::TidioService;

//! # Tidio MCP Core
//!
//! Domain types shared by the bridge crates:
//!
//! - `config` - Explicit configuration passed to constructors (no globals)
//! - `credentials` - The persisted credential record
//! - `embed` - Chat-widget embed snippet generation and key validation
//! - `error` - Typed errors for the OAuth and API layers

pub mod config;
pub mod credentials;
pub mod embed;
pub mod error;

pub use config::TidioConfig;
pub use credentials::{CredentialRecord, NewCredentials};
pub use embed::EmbedMode;
pub use error::TidioError;

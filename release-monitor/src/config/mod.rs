//! Monitor configuration.
//!
//! This module handles parsing the monitor's TOML configuration and resolving
//! the configured `owner/repo` strings into [`RepositoryRef`]s.

mod error;
mod metadata;
mod monitor;
mod repository;

pub use error::ConfigError;
pub use metadata::{default_footer_icon, default_lead_in_format, MessageFormat};
pub use monitor::MonitorConfig;
pub use repository::{resolve_repositories, RepositoryRef};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → handed to scheduler, history, API at startup
//! ```
//!
//! # Design Decisions
//! - Config is loaded once; targets are fixed for the process lifetime
//! - All sections have defaults; only the target list is required
//! - Validation separates syntactic (serde) from semantic checks
//! - Any load error is fatal: nothing is scheduled or served

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CorsConfig, HistoryBackend, HistoryConfig, ListenerConfig, LogFormat, MonitorConfig,
    ObservabilityConfig, ProbeConfig, PublishPolicy, SchedulerConfig, TlsConfig,
};

//! HTTP query API subsystem.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → server.rs (middleware: request ID, trace, CORS, timeout)
//!     → handlers.rs
//!     → service.rs (snapshot store read / history query)
//!     → JSON response
//! ```
//!
//! # Endpoints
//! - `GET /` static status page
//! - `GET /health` latest snapshot (503 before the first round)
//! - `GET /health-one-server?url=` history for one target (400 / 404 / 503)

pub mod handlers;
pub mod server;
pub mod service;

pub use server::{build_router, HttpServer};
pub use service::{HistoryError, MonitorService};

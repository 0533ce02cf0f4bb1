//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / navigation / history
//!     → tracing macros (structured fields: path, route, queued)
//!     → logging.rs (subscriber: env filter + fmt or JSON layer)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is opt-in
//! - `RUST_LOG` wins over the configured level

pub mod logging;

pub use logging::init_logging;

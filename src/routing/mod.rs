//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Template string (e.g. /users/{id:[0-9]+})
//!     → sanitize.rs (normalise slashes)
//!     → route.rs (scan params, compile matchers)
//!     → pointer.rs (register in priority order)
//!
//! Incoming path:
//!     → pointer.rs (try each route in insertion order)
//!     → route.rs (anchor literals, read values)
//!     → Return: PointerMatch { params, route, template, path } or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled once, immutable afterwards
//! - First match wins (insertion order)
//! - Match misses are `None`; only authoring mistakes are errors

pub mod error;
pub mod params;
pub mod pointer;
pub mod route;
pub mod sanitize;

pub use error::{RouteError, RouteResult};
pub use params::Params;
pub use pointer::{Pointer, PointerMatch};
pub use route::{Param, Route, DEFAULT_PATTERN};
pub use sanitize::sanitize;

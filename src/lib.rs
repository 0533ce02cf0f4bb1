//! Waypoint: route templates and a single-flight navigation router.
//!
//! # Architecture Overview
//!
//! ```text
//!   Location change (back/forward, push_state, replace_state)
//!          │
//!          ▼
//!   ┌──────────────┐   pop-style   ┌──────────────────────────────┐
//!   │   history    │──────────────▶│          navigation          │
//!   │   adapter    │◀──────────────│  Router: queue, hooks,       │
//!   └──────────────┘  push/replace │  redirects, listeners        │
//!                                  └──────────────┬───────────────┘
//!                                                 │ match / resolve
//!                                                 ▼
//!                                  ┌──────────────────────────────┐
//!                                  │           routing            │
//!                                  │  Route (compile/parse/       │
//!                                  │  resolve), Pointer registry  │
//!                                  └──────────────────────────────┘
//!
//!   config (TOML manifest)  ·  observability (tracing subscriber)
//! ```

pub mod config;
pub mod history;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use history::{HistoryAdapter, MemoryHistory, StaticHistory};
pub use navigation::{Navigation, Redirect, RouteDefinition, Router, RouterError, RouterEvent};
pub use routing::{Params, Pointer, Route, RouteError};

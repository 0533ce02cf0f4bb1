//! Navigation layer.
//!
//! # Data Flow
//! ```text
//! History change / push_state / replace_state
//!     → Router::on_change_path (queued if a cycle is running)
//!     → query::split (pathname + query)
//!     → Pointer::match_path
//!         ├─ miss  → RouterEvent::RouteNotFound
//!         └─ hit   → listeners → on_before hook
//!                      ├─ redirected → next cycle for the target
//!                      └─ passed     → route callback → RouterEvent::Navigated
//!     → next queued path, until the queue is empty
//! ```
//!
//! # Design Decisions
//! - One cycle at a time; requests made during a cycle are queued FIFO
//! - A redirect runs before anything already queued
//! - A failing callback is logged and reported, never wedges the queue
//! - Route names are unique; templates may be shared by several names

pub mod definition;
pub mod error;
pub mod event;
pub mod query;
pub mod redirect;
pub mod router;

pub use definition::{BeforeHook, CallbackResult, Navigation, RouteCallback, RouteDefinition};
pub use error::{BoxError, RouterError, RouterResult};
pub use event::{ListenerId, RouterEvent};
pub use redirect::Redirect;
pub use router::{RouteInfo, Router};

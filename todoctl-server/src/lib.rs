//! todoctl-server: HTTP JSON API over the task list
//!
//! Handlers open one session per request through the shared
//! [`SessionFactory`](todoctl_core::SessionFactory).

pub mod http;
pub mod state;

pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
pub use state::AppState;

//! Application state shared across handlers

use std::sync::Arc;

use todoctl_core::{Engine, SessionFactory};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    sessions: SessionFactory,
}

impl AppState {
    pub fn new(sessions: SessionFactory) -> Self {
        Self {
            inner: Arc::new(AppStateInner { sessions }),
        }
    }

    pub fn sessions(&self) -> &SessionFactory {
        &self.inner.sessions
    }

    pub fn engine(&self) -> &Engine {
        self.inner.sessions.engine()
    }
}

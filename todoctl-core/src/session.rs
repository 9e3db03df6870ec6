//! Session factory bound to an [`Engine`].
//!
//! Sessions never autocommit and never autoflush: each one is a single
//! transaction that must be committed explicitly. A session dropped without
//! `commit` is rolled back.

use sqlx::{PgConnection, Postgres, Transaction};
use tracing::debug;

use crate::engine::Engine;
use crate::error::DbError;

/// Produces [`Session`]s against one engine.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    engine: Engine,
}

impl SessionFactory {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Always `false`: work is visible only after [`Session::commit`].
    pub fn autocommit(&self) -> bool {
        false
    }

    /// Always `false`: statements run when issued, nothing is buffered.
    pub fn autoflush(&self) -> bool {
        false
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Open a new session (begins a transaction).
    pub async fn session(&self) -> Result<Session, DbError> {
        let tx = self.engine.pool().begin().await?;
        debug!("session opened");
        Ok(Session { tx })
    }
}

/// One unit of work.
pub struct Session {
    tx: Transaction<'static, Postgres>,
}

impl Session {
    /// Connection for running queries inside this session.
    ///
    /// ```ignore
    /// let mut session = factory.session().await?;
    /// sqlx::query("DELETE FROM tasks").execute(session.conn()).await?;
    /// session.commit().await?;
    /// ```
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), DbError> {
        self.tx.commit().await?;
        debug!("session committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), DbError> {
        self.tx.rollback().await?;
        debug!("session rolled back");
        Ok(())
    }
}

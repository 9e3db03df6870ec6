//! todoctl-core: database bootstrap for the todoctl task service
//!
//! Resolves the connection string from `DATABASE_URL`, builds an [`Engine`]
//! (connection pool), hands out transactional [`Session`]s through a
//! [`SessionFactory`], and lets models declare their tables via [`Model`] and
//! [`Metadata`].
//!
//! ```ignore
//! let config = DatabaseConfig::from_env()?;
//! let engine = Engine::new(&config)?;
//! let sessions = SessionFactory::new(engine);
//! ```

pub mod config;
pub mod dsn;
pub mod engine;
pub mod error;
pub mod model;
pub mod session;
pub mod tasks;

pub use config::{load_dotenv, DatabaseConfig};
pub use dsn::DatabaseUrl;
pub use engine::Engine;
pub use error::{ConfigError, DbError, UrlError, ValidationError};
pub use model::{Metadata, Model};
pub use session::{Session, SessionFactory};
pub use tasks::{Task, TaskRepo, TaskTitle};

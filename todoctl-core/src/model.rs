//! Declarative base for table-backed models.
//!
//! A model declares its table name and idempotent DDL through [`Model`];
//! [`Metadata`] collects the models an application uses and creates their
//! tables in one transaction.

use tracing::info;

use crate::engine::Engine;
use crate::error::DbError;
use crate::tasks::Task;

/// A type stored in its own table.
pub trait Model {
    /// Table name.
    const TABLE: &'static str;

    /// `CREATE TABLE IF NOT EXISTS ...` for this model.
    fn create_sql() -> &'static str;

    /// Extra statements (indexes) run after the table exists.
    fn index_sql() -> &'static [&'static str] {
        &[]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableDef {
    name: &'static str,
    create: &'static str,
    indexes: &'static [&'static str],
}

/// Ordered registry of model tables.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    tables: Vec<TableDef>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every model this application defines.
    pub fn base() -> Self {
        let mut metadata = Self::new();
        metadata.register::<Task>();
        metadata
    }

    /// Add `M`'s table. Registering the same table twice is a no-op.
    pub fn register<M: Model>(&mut self) -> &mut Self {
        if !self.tables.iter().any(|t| t.name == M::TABLE) {
            self.tables.push(TableDef {
                name: M::TABLE,
                create: M::create_sql(),
                indexes: M::index_sql(),
            });
        }
        self
    }

    /// Table names in registration order.
    pub fn tables(&self) -> Vec<&'static str> {
        self.tables.iter().map(|t| t.name).collect()
    }

    /// Create every registered table (and its indexes) that does not exist yet.
    pub async fn create_all(&self, engine: &Engine) -> Result<(), DbError> {
        let mut tx = engine.pool().begin().await?;

        for table in &self.tables {
            sqlx::query(table.create).execute(&mut *tx).await?;
            for index in table.indexes {
                sqlx::query(index).execute(&mut *tx).await?;
            }
        }

        tx.commit().await?;
        info!(tables = ?self.tables(), "tables created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note;

    impl Model for Note {
        const TABLE: &'static str = "notes";

        fn create_sql() -> &'static str {
            "CREATE TABLE IF NOT EXISTS notes (id SERIAL PRIMARY KEY)"
        }
    }

    #[test]
    fn base_registers_tasks() {
        assert_eq!(Metadata::base().tables(), vec!["tasks"]);
    }

    #[test]
    fn register_keeps_order_and_skips_duplicates() {
        let mut metadata = Metadata::base();
        metadata.register::<Note>().register::<Task>().register::<Note>();
        assert_eq!(metadata.tables(), vec!["tasks", "notes"]);
    }

    #[test]
    fn ddl_is_idempotent() {
        assert!(Task::create_sql().contains("IF NOT EXISTS"));
        assert!(Task::index_sql()
            .iter()
            .all(|sql| sql.contains("IF NOT EXISTS")));
    }
}

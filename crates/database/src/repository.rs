use crate::connection;
use crate::error::DbError;
use crate::outcome::Outcome;
use crate::query;
use crate::schema;
use configuration::DatabaseSettings;
use core_types::{
    Author, AuthorEdition, CatalogRow, CatalogRows, Collection, Condition, CoreError, Edition,
    EditionCollection, NewRecord, Patch, Table,
};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, FromRow, Postgres, QueryBuilder};
use tracing::{debug, instrument, warn};

/// The `CatalogStore` provides a typed interface to the catalog tables.
/// It owns exactly one connection; every call runs in its own transaction that is
/// committed on success and rolled back on any failure, leaving the store usable.
#[derive(Debug)]
pub struct CatalogStore {
    pub(crate) conn: PgConnection,
}

impl CatalogStore {
    /// Wraps an already-open connection.
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }

    /// Opens a connection with the configured parameters.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbError> {
        Ok(Self::new(connection::connect(settings).await?))
    }

    /// Gracefully closes the connection. Dropping the store closes it too, without
    /// waiting for the server to acknowledge.
    pub async fn close(self) -> Result<(), DbError> {
        self.conn.close().await?;
        Ok(())
    }

    /// Direct access to the connection, for ad-hoc statements.
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Creates any missing catalog tables. Safe to call on every startup.
    #[instrument(skip(self))]
    pub async fn bootstrap_schema(&mut self) -> Result<Outcome, DbError> {
        schema::create_tables(&mut self.conn).await?;
        Ok(Outcome::SchemaReady)
    }

    // ==========================================================================
    // Reads
    // ==========================================================================

    /// Fetches every row of `R`'s table, in primary-key order.
    pub async fn fetch_all<R>(&mut self) -> Result<Vec<R>, DbError>
    where
        R: CatalogRow + for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = query::select_all(R::TABLE);
        let rows = sqlx::query_as::<_, R>(&sql).fetch_all(&mut self.conn).await?;
        Ok(rows)
    }

    pub async fn authors(&mut self) -> Result<Vec<Author>, DbError> {
        self.fetch_all().await
    }

    pub async fn collections(&mut self) -> Result<Vec<Collection>, DbError> {
        self.fetch_all().await
    }

    pub async fn editions(&mut self) -> Result<Vec<Edition>, DbError> {
        self.fetch_all().await
    }

    pub async fn author_editions(&mut self) -> Result<Vec<AuthorEdition>, DbError> {
        self.fetch_all().await
    }

    pub async fn edition_collections(&mut self) -> Result<Vec<EditionCollection>, DbError> {
        self.fetch_all().await
    }

    /// Reads every row of `table`.
    #[instrument(skip(self), fields(table = %table))]
    pub async fn list(&mut self, table: Table) -> Result<CatalogRows, DbError> {
        Ok(match table {
            Table::Author => CatalogRows::Authors(self.authors().await?),
            Table::Collection => CatalogRows::Collections(self.collections().await?),
            Table::Edition => CatalogRows::Editions(self.editions().await?),
            Table::AuthorEdition => CatalogRows::AuthorEditions(self.author_editions().await?),
            Table::EditionCollection => {
                CatalogRows::EditionCollections(self.edition_collections().await?)
            }
        })
    }

    pub async fn count(&mut self, table: Table) -> Result<i64, DbError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.ident());
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&mut self.conn).await?;
        Ok(count)
    }

    // ==========================================================================
    // Writes
    // ==========================================================================

    /// Inserts one row. Foreign-key and uniqueness violations come back as
    /// [`DbError::ForeignKeyViolation`] and [`DbError::DuplicateKey`].
    #[instrument(skip_all, fields(table = %record.table()))]
    pub async fn insert(&mut self, record: NewRecord) -> Result<Outcome, DbError> {
        let table = record.table();
        self.execute(query::insert(table, record.into_fields())).await?;
        Ok(Outcome::Added { table })
    }

    /// Applies `patch` to the rows matching `condition`.
    ///
    /// An empty patch or a missing condition is refused with
    /// [`DbError::InsufficientInformation`] before anything is sent to the database.
    #[instrument(skip_all, fields(table = %patch.table()))]
    pub async fn update(
        &mut self,
        patch: Patch,
        condition: Option<Condition>,
    ) -> Result<Outcome, DbError> {
        let table = patch.table();
        let fields = patch.into_fields();
        let Some(condition) = condition.filter(|_| !fields.is_empty()) else {
            return Err(DbError::InsufficientInformation("update"));
        };
        ensure_same_table(table, &condition)?;

        let rows = self.execute(query::update(table, fields, condition)).await?;
        Ok(Outcome::Updated { table, rows })
    }

    /// Deletes the rows matching a single equality condition.
    #[instrument(skip_all, fields(table = %condition.table()))]
    pub async fn delete(&mut self, condition: Condition) -> Result<Outcome, DbError> {
        let table = condition.table();
        let rows = self.execute(query::delete(table, vec![condition])).await?;
        Ok(Outcome::Deleted { table, rows })
    }

    /// Deletes the rows matching all `conditions`, e.g. one link by its composite key.
    #[instrument(skip(self, conditions), fields(table = %table))]
    pub async fn delete_composite(
        &mut self,
        table: Table,
        conditions: Vec<Condition>,
    ) -> Result<Outcome, DbError> {
        if conditions.is_empty() {
            return Err(DbError::InsufficientInformation("delete"));
        }
        for condition in &conditions {
            ensure_same_table(table, condition)?;
        }
        let rows = self.execute(query::delete(table, conditions)).await?;
        Ok(Outcome::Deleted { table, rows })
    }

    /// Runs one statement in its own transaction and returns the affected row count.
    async fn execute(&mut self, mut builder: QueryBuilder<'static, Postgres>) -> Result<u64, DbError> {
        debug!(sql = builder.sql(), "executing");
        let mut tx = self.conn.begin().await?;
        match builder.build().execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await?;
                Ok(result.rows_affected())
            }
            Err(err) => {
                warn!(error = %err, "statement failed, rolling back");
                Err(after_rollback(err.into(), tx.rollback().await))
            }
        }
    }
}

/// The statement error is what the caller sees; a failed rollback is only logged.
pub(crate) fn after_rollback(err: DbError, rollback: Result<(), sqlx::Error>) -> DbError {
    if let Err(rollback_err) = rollback {
        warn!(error = %rollback_err, "rollback failed");
    }
    err
}

fn ensure_same_table(table: Table, condition: &Condition) -> Result<(), DbError> {
    if condition.table() == table {
        return Ok(());
    }
    Err(CoreError::UnknownColumn {
        table: table.name().to_string(),
        column: format!("{}.{}", condition.table(), condition.column()),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_must_target_the_same_table() {
        let cond = Condition::new(Table::AuthorEdition, "author_id", 1).unwrap();
        assert!(ensure_same_table(Table::AuthorEdition, &cond).is_ok());
        assert!(matches!(
            ensure_same_table(Table::Author, &cond),
            Err(DbError::InvalidInput(CoreError::UnknownColumn { .. }))
        ));
    }

    #[test]
    fn test_failed_rollback_keeps_the_statement_error() {
        let err = after_rollback(DbError::DuplicateKey("pair".into()), Err(sqlx::Error::PoolClosed));
        assert!(matches!(err, DbError::DuplicateKey(ref detail) if detail == "pair"), "{err:?}");

        let err = after_rollback(DbError::InsufficientInformation("update"), Ok(()));
        assert!(matches!(err, DbError::InsufficientInformation("update")));
    }
}

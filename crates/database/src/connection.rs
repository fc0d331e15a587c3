use crate::error::DbError;
use configuration::DatabaseSettings;
use configuration::settings::is_identifier;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, info};

/// Builds the driver's connection options from the configured parameters.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
}

/// Opens the single connection the catalog store works on.
///
/// When a schema is configured it is created if missing and put first on the
/// `search_path`, so every unqualified table name resolves inside it.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgConnection, DbError> {
    settings
        .validate()
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;

    let mut conn = PgConnection::connect_with(&connect_options(settings))
        .await
        .map_err(DbError::ConnectionError)?;
    info!(host = %settings.host, port = settings.port, database = %settings.name, "connected to catalog database");

    if let Some(schema) = &settings.schema {
        use_schema(&mut conn, schema).await?;
    }
    Ok(conn)
}

/// Creates `schema` if needed and makes it the connection's default.
pub async fn use_schema(conn: &mut PgConnection, schema: &str) -> Result<(), DbError> {
    if !is_identifier(schema) {
        return Err(DbError::ConnectionConfigError(format!(
            "'{schema}' is not a plain SQL identifier"
        )));
    }
    // Identifiers cannot be bound as parameters; the name was checked above.
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
        .execute(&mut *conn)
        .await?;
    sqlx::query(&format!("SET search_path TO {schema}"))
        .execute(&mut *conn)
        .await?;
    debug!(schema, "search_path set");
    Ok(())
}

use core_types::CoreError;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

/// The driver error wrapped by [`DbError::Query`] and [`DbError::ConnectionError`].
pub use sqlx::Error as SqlxError;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("ERROR: Foreign key violation.\n{0}")]
    ForeignKeyViolation(String),

    #[error("ERROR: Duplicate key.\n{0}")]
    DuplicateKey(String),

    #[error("{0}")]
    Query(#[source] sqlx::Error),

    #[error("Insufficient information to {0} data.")]
    InsufficientInformation(&'static str),

    #[error("{0}")]
    NothingToLink(&'static str),

    #[error("{0}")]
    InvalidInput(#[from] CoreError),
}

impl DbError {
    /// True for the failures detected before any statement reached the database.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DbError::InsufficientInformation(_) | DbError::NothingToLink(_) | DbError::InvalidInput(_)
        )
    }
}

/// Classifies constraint violations by SQLSTATE; everything else is reported verbatim.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::ForeignKeyViolation => {
                    return DbError::ForeignKeyViolation(describe(&**db_err));
                }
                ErrorKind::UniqueViolation => return DbError::DuplicateKey(describe(&**db_err)),
                _ => {}
            }
        }
        DbError::Query(err)
    }
}

/// The server message plus PostgreSQL's `DETAIL` line, which names the offending key.
fn describe(db_err: &(dyn DatabaseError + 'static)) -> String {
    let detail = db_err.try_downcast_ref::<PgDatabaseError>().and_then(PgDatabaseError::detail);
    with_detail(db_err.message(), detail)
}

fn with_detail(message: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("{message}\nDETAIL:  {detail}"),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_stay_verbatim() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::Query(sqlx::Error::RowNotFound)));
        assert_eq!(err.to_string(), sqlx::Error::RowNotFound.to_string());
    }

    #[test]
    fn test_precondition_messages() {
        assert_eq!(
            DbError::InsufficientInformation("update").to_string(),
            "Insufficient information to update data."
        );
        assert!(DbError::NothingToLink("nothing").is_precondition());
        assert!(!DbError::DuplicateKey("dup".into()).is_precondition());
    }

    #[test]
    fn test_constraint_message_carries_detail() {
        let message = r#"duplicate key value violates unique constraint "Author_Collection_Edition_pkey""#;
        let detail = "Key (author_id, edition_id)=(1, 2) already exists.";
        assert_eq!(
            with_detail(message, Some(detail)),
            format!("{message}\nDETAIL:  {detail}")
        );
        assert_eq!(with_detail(message, None), message);
    }
}

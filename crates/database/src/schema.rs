//! Table definitions for the catalog.
//!
//! There is no migration history: every statement is `CREATE TABLE IF NOT EXISTS`, so
//! running the whole set again on an existing database changes nothing.

use crate::error::DbError;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tracing::info;

/// DDL in dependency order: referenced tables come before the link tables.
pub const CREATE_TABLES: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS "Author" (
        author_id SERIAL PRIMARY KEY,
        name VARCHAR NOT NULL,
        surname VARCHAR NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "Collection" (
        collection_id SERIAL PRIMARY KEY,
        name VARCHAR NOT NULL,
        type VARCHAR NOT NULL,
        view VARCHAR NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "Edition" (
        edition_id SERIAL PRIMARY KEY,
        name VARCHAR NOT NULL,
        branch VARCHAR NOT NULL,
        number_of_pages INT NOT NULL,
        languages VARCHAR NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "Author_Collection_Edition" (
        author_id INT NOT NULL REFERENCES "Author" (author_id) ON DELETE CASCADE,
        edition_id INT NOT NULL REFERENCES "Edition" (edition_id) ON DELETE CASCADE,
        PRIMARY KEY (author_id, edition_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "Author_Collection_Edition_ED" (
        edition_id INT NOT NULL REFERENCES "Edition" (edition_id) ON DELETE CASCADE,
        collection_id INT NOT NULL REFERENCES "Collection" (collection_id) ON DELETE CASCADE,
        date DATE,
        PRIMARY KEY (edition_id, collection_id)
    )
    "#,
];

/// Ensures all five tables exist, in a single transaction.
pub async fn create_tables(conn: &mut PgConnection) -> Result<(), DbError> {
    let mut tx = conn.begin().await?;
    for ddl in CREATE_TABLES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("catalog schema is in place");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Table;

    #[test]
    fn test_every_table_has_ddl_with_its_columns() {
        for (ddl, table) in CREATE_TABLES.iter().zip(Table::ALL) {
            assert!(ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table.ident())));
            for column in table.columns() {
                assert!(ddl.contains(column.name), "{} missing {}", table, column.name);
            }
        }
    }

    #[test]
    fn test_link_tables_cascade() {
        for ddl in &CREATE_TABLES[3..] {
            assert_eq!(ddl.matches("ON DELETE CASCADE").count(), 2);
            assert!(ddl.contains("PRIMARY KEY ("));
        }
    }
}

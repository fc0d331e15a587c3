//! Synthetic catalog rows for filling a test database.

use crate::error::DbError;
use crate::outcome::Outcome;
use crate::query;
use crate::repository::{after_rollback, CatalogStore};
use chrono::NaiveDate;
use core_types::{
    AuthorEdition, Branch, Category, EditionCollection, Language, Medium, NewAuthor, NewCollection,
    NewEdition, NewRecord, Table,
};
use rand::Rng;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tracing::{debug, info, instrument, warn};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const MIN_PAGES: i32 = 50;
pub const MAX_PAGES: i32 = 1000;
pub const FIRST_YEAR: i32 = 1800;
pub const LAST_YEAR: i32 = 2020;

/// A string of `len` ASCII letters, mixed case.
pub fn random_letters<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

pub fn random_author<R: Rng + ?Sized>(rng: &mut R) -> NewAuthor {
    NewAuthor { name: random_letters(rng, 5), surname: random_letters(rng, 7) }
}

pub fn random_collection<R: Rng + ?Sized>(rng: &mut R) -> NewCollection {
    NewCollection {
        name: random_letters(rng, 8),
        kind: pick(rng, &Category::ALL).as_str().to_string(),
        view: pick(rng, &Medium::ALL).as_str().to_string(),
    }
}

pub fn random_edition<R: Rng + ?Sized>(rng: &mut R) -> NewEdition {
    NewEdition {
        name: random_letters(rng, 6),
        branch: pick(rng, &Branch::ALL).as_str().to_string(),
        number_of_pages: rng.gen_range(MIN_PAGES..=MAX_PAGES),
        languages: pick(rng, &Language::ALL).as_str().to_string(),
    }
}

/// A date between 1800-01-01 and 2020-12-28. The day never exceeds 28, which exists
/// in every month.
pub fn random_date<R: Rng + ?Sized>(rng: &mut R) -> NaiveDate {
    let year = rng.gen_range(FIRST_YEAR..=LAST_YEAR);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// `count` entity rows for one of the three entity tables.
pub fn random_records<R: Rng + ?Sized>(rng: &mut R, table: Table, count: usize) -> Vec<NewRecord> {
    (0..count)
        .filter_map(|_| match table {
            Table::Author => Some(NewRecord::Author(random_author(rng))),
            Table::Collection => Some(NewRecord::Collection(random_collection(rng))),
            Table::Edition => Some(NewRecord::Edition(random_edition(rng))),
            Table::AuthorEdition | Table::EditionCollection => None,
        })
        .collect()
}

/// `count` random pairings of existing author and edition ids. Pairs may repeat.
pub fn random_author_editions<R: Rng + ?Sized>(
    rng: &mut R,
    authors: &[i32],
    editions: &[i32],
    count: usize,
) -> Vec<NewRecord> {
    if authors.is_empty() || editions.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            NewRecord::AuthorEdition(AuthorEdition {
                author_id: pick(rng, authors),
                edition_id: pick(rng, editions),
            })
        })
        .collect()
}

/// `count` random dated pairings of existing edition and collection ids. Pairs may repeat.
pub fn random_edition_collections<R: Rng + ?Sized>(
    rng: &mut R,
    editions: &[i32],
    collections: &[i32],
    count: usize,
) -> Vec<NewRecord> {
    if editions.is_empty() || collections.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            NewRecord::EditionCollection(EditionCollection {
                edition_id: pick(rng, editions),
                collection_id: pick(rng, collections),
                date: Some(random_date(rng)),
            })
        })
        .collect()
}

async fn ids(conn: &mut PgConnection, column: &str, table: Table) -> Result<Vec<i32>, DbError> {
    let sql = format!("SELECT {column} FROM {}", table.ident());
    Ok(sqlx::query_scalar::<_, i32>(&sql).fetch_all(conn).await?)
}

/// Builds the batch for `table`, reading the ids that link rows must reference.
async fn plan(conn: &mut PgConnection, table: Table, count: usize) -> Result<Vec<NewRecord>, DbError> {
    match table {
        Table::Author | Table::Collection | Table::Edition => {
            Ok(random_records(&mut rand::thread_rng(), table, count))
        }
        Table::AuthorEdition => {
            let authors = ids(conn, "author_id", Table::Author).await?;
            let editions = ids(conn, "edition_id", Table::Edition).await?;
            if authors.is_empty() || editions.is_empty() {
                return Err(DbError::NothingToLink(
                    "No authors or editions to link. Generate them first.",
                ));
            }
            Ok(random_author_editions(&mut rand::thread_rng(), &authors, &editions, count))
        }
        Table::EditionCollection => {
            let editions = ids(conn, "edition_id", Table::Edition).await?;
            let collections = ids(conn, "collection_id", Table::Collection).await?;
            if editions.is_empty() || collections.is_empty() {
                return Err(DbError::NothingToLink(
                    "No editions or collections to link. Generate them first.",
                ));
            }
            Ok(random_edition_collections(&mut rand::thread_rng(), &editions, &collections, count))
        }
    }
}

/// Inserts the batch. A link pair that already exists is skipped on its own
/// (`ON CONFLICT DO NOTHING`); the rest of the batch goes ahead.
async fn insert_batch(conn: &mut PgConnection, records: Vec<NewRecord>) -> Result<u64, DbError> {
    let mut inserted = 0;
    for record in records {
        let table = record.table();
        let mut builder = query::insert(table, record.into_fields());
        if table.is_link() {
            builder.push(" ON CONFLICT DO NOTHING");
        }
        let affected = builder.build().execute(&mut *conn).await?.rows_affected();
        if affected == 0 {
            debug!(%table, "duplicate pair skipped");
        }
        inserted += affected;
    }
    Ok(inserted)
}

impl CatalogStore {
    /// Adds `count` synthetic rows to `table` in one transaction.
    ///
    /// For link tables the count is best effort: random pairs that already exist are
    /// skipped, so fewer than `count` rows may be added. Any other failure rolls the
    /// whole batch back.
    #[instrument(skip(self), fields(table = %table))]
    pub async fn generate(&mut self, table: Table, count: usize) -> Result<Outcome, DbError> {
        let mut tx = self.conn.begin().await?;
        let result = match plan(&mut tx, table, count).await {
            Ok(records) => insert_batch(&mut tx, records).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(inserted) => {
                tx.commit().await?;
                info!(requested = count, inserted, "generated rows");
                Ok(Outcome::Generated { table, requested: count as u64, inserted })
            }
            Err(err) => {
                warn!(error = %err, "generation failed, rolling back");
                Err(after_rollback(err, tx.rollback().await))
            }
        }
    }
}

use crate::error::DbError;
use crate::repository::CatalogStore;
use core_types::{SearchCriteria, SearchHit};
use tracing::{debug, instrument};

/// Authors joined through their editions to the collections those editions appear in.
pub const ADVANCED_SEARCH_SQL: &str = r#"
    SELECT a.name, a.surname, ed.name AS edition_name, ed.number_of_pages, ec.date, c.name AS collection_name
    FROM "Author" a
    JOIN "Author_Collection_Edition" ae ON a.author_id = ae.author_id
    JOIN "Edition" ed ON ae.edition_id = ed.edition_id
    JOIN "Author_Collection_Edition_ED" ec ON ed.edition_id = ec.edition_id
    JOIN "Collection" c ON ec.collection_id = c.collection_id
    WHERE a.surname ILIKE $1
      AND ed.number_of_pages BETWEEN $2 AND $3
      AND ec.date BETWEEN $4 AND $5
    ORDER BY a.surname, ed.number_of_pages
"#;

impl CatalogStore {
    /// Finds every author/edition/collection combination whose surname contains the
    /// pattern (case-insensitive), whose page count and link date fall in the inclusive
    /// ranges. Ordered by surname, then page count.
    #[instrument(skip(self))]
    pub async fn advanced_search(&mut self, criteria: &SearchCriteria) -> Result<Vec<SearchHit>, DbError> {
        let hits = sqlx::query_as::<_, SearchHit>(ADVANCED_SEARCH_SQL)
            .bind(criteria.like_pattern())
            .bind(criteria.min_pages)
            .bind(criteria.max_pages)
            .bind(criteria.start_date)
            .bind(criteria.end_date)
            .fetch_all(&mut self.conn)
            .await?;
        debug!(hits = hits.len(), "advanced search finished");
        Ok(hits)
    }
}

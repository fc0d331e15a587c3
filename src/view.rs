//! Presentation layer: turns store results into terminal output.
//!
//! Everything is rendered to a `String` first so the formatting can be tested without
//! capturing stdout.

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table as TextTable};
use core_types::{CatalogRows, SearchHit, Table};
use database::{DbError, Outcome};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Renders outcomes, rows and errors in the chosen format.
#[derive(Debug, Clone, Copy)]
pub struct View {
    format: OutputFormat,
}

impl View {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn show_outcome(&self, outcome: &Outcome) {
        println!("{}", self.render_outcome(outcome));
    }

    pub fn show_rows(&self, rows: &CatalogRows) {
        println!("{}", self.render_rows(rows));
    }

    pub fn show_hits(&self, hits: &[SearchHit]) {
        println!("{}", self.render_hits(hits));
    }

    pub fn show_count(&self, table: Table, count: i64) {
        println!("{}", self.render_count(table, count));
    }

    /// Errors go to stderr so JSON on stdout stays parseable.
    pub fn show_error(&self, err: &DbError) {
        eprintln!("{}", self.render_error(err));
    }

    pub fn render_outcome(&self, outcome: &Outcome) -> String {
        match self.format {
            OutputFormat::Table => outcome.to_string(),
            OutputFormat::Json => {
                let mut value = json!(outcome);
                value["message"] = json!(outcome.to_string());
                value.to_string()
            }
        }
    }

    pub fn render_rows(&self, rows: &CatalogRows) -> String {
        match self.format {
            OutputFormat::Table if rows.is_empty() => format!("No rows in {}.", rows.table()),
            OutputFormat::Table => grid(&rows.headers(), rows.cells()),
            OutputFormat::Json => json!(rows).to_string(),
        }
    }

    pub fn render_hits(&self, hits: &[SearchHit]) -> String {
        match self.format {
            OutputFormat::Table if hits.is_empty() => "No results found.".to_string(),
            OutputFormat::Table => {
                let cells = hits.iter().map(SearchHit::cells).collect();
                format!("{}\nRows returned: {}", grid(&SearchHit::HEADERS, cells), hits.len())
            }
            OutputFormat::Json => json!(hits).to_string(),
        }
    }

    pub fn render_count(&self, table: Table, count: i64) -> String {
        match self.format {
            OutputFormat::Table => format!("{table}: {count} row(s)"),
            OutputFormat::Json => json!({ "table": table, "count": count }).to_string(),
        }
    }

    pub fn render_error(&self, err: &DbError) -> String {
        match self.format {
            OutputFormat::Table if err.is_precondition() => err.to_string(),
            OutputFormat::Table => match err {
                DbError::ForeignKeyViolation(_) | DbError::DuplicateKey(_) => err.to_string(),
                _ => format!("ERROR: {err}"),
            },
            OutputFormat::Json => json!({ "error": err.to_string() }).to_string(),
        }
    }
}

fn grid(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut table = TextTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Green)));
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Author;

    fn authors() -> CatalogRows {
        CatalogRows::Authors(vec![Author {
            author_id: 1,
            name: "Lina".into(),
            surname: "Kostenko".into(),
        }])
    }

    #[test]
    fn test_table_output_contains_headers_and_values() {
        let out = View::new(OutputFormat::Table).render_rows(&authors());
        for needle in ["author_id", "surname", "Lina", "Kostenko"] {
            assert!(out.contains(needle), "missing {needle} in\n{out}");
        }
    }

    #[test]
    fn test_empty_rows_message() {
        let out = View::new(OutputFormat::Table).render_rows(&CatalogRows::Editions(vec![]));
        assert_eq!(out, "No rows in Edition.");
    }

    #[test]
    fn test_json_rows_are_a_plain_array() {
        let out = View::new(OutputFormat::Json).render_rows(&authors());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["surname"], "Kostenko");
    }

    #[test]
    fn test_outcome_rendering() {
        let outcome = Outcome::Deleted { table: Table::AuthorEdition, rows: 2 };
        assert_eq!(
            View::new(OutputFormat::Table).render_outcome(&outcome),
            "Deleted successfully! (2 row(s))"
        );
        let value: serde_json::Value =
            serde_json::from_str(&View::new(OutputFormat::Json).render_outcome(&outcome)).unwrap();
        assert_eq!(value["outcome"], "deleted");
        assert_eq!(value["table"], "author-edition");
        assert_eq!(value["rows"], 2);
    }

    #[test]
    fn test_error_rendering() {
        let view = View::new(OutputFormat::Table);
        assert_eq!(
            view.render_error(&DbError::InsufficientInformation("update")),
            "Insufficient information to update data."
        );
        assert_eq!(
            view.render_error(&DbError::DuplicateKey("pair exists".into())),
            "ERROR: Duplicate key.\npair exists"
        );
        assert_eq!(
            view.render_error(&DbError::Query(sqlx_row_not_found())),
            format!("ERROR: {}", sqlx_row_not_found())
        );
    }

    fn sqlx_row_not_found() -> database::error::SqlxError {
        database::error::SqlxError::RowNotFound
    }
}

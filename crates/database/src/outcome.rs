use core_types::Table;
use serde::Serialize;
use std::fmt;

/// What a successful mutating call did. The presentation layer decides how to show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    SchemaReady,
    Added { table: Table },
    Updated { table: Table, rows: u64 },
    Deleted { table: Table, rows: u64 },
    /// `inserted` may fall short of `requested` when random link pairs collide.
    Generated { table: Table, requested: u64, inserted: u64 },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::SchemaReady => f.write_str("Schema is ready."),
            Outcome::Added { .. } => f.write_str("Added successfully!"),
            Outcome::Updated { rows, .. } => write!(f, "Updated successfully! ({rows} row(s))"),
            Outcome::Deleted { rows, .. } => write!(f, "Deleted successfully! ({rows} row(s))"),
            Outcome::Generated { table, requested, inserted } => write!(
                f,
                "Generated successfully! ({inserted} of {requested} row(s) added to {table})"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Outcome::Added { table: Table::Author }.to_string(), "Added successfully!");
        assert_eq!(
            Outcome::Generated { table: Table::AuthorEdition, requested: 5, inserted: 4 }.to_string(),
            "Generated successfully! (4 of 5 row(s) added to Author_Collection_Edition)"
        );
    }
}

use crate::error::CoreError;
use crate::value::Value;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of tables that make up the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Table {
    Author,
    Collection,
    Edition,
    AuthorEdition,
    EditionCollection,
}

/// The storage type of a column, used to parse raw text into a bindable [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Date,
}

/// Static description of one column, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Filled in by the database (`SERIAL`), never supplied on insert.
    pub generated: bool,
    pub nullable: bool,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef { name, kind, generated: false, nullable: false }
}

const fn serial(name: &'static str) -> ColumnDef {
    ColumnDef { name, kind: ColumnKind::Integer, generated: true, nullable: false }
}

const fn optional(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef { name, kind, generated: false, nullable: true }
}

const AUTHOR_COLUMNS: &[ColumnDef] = &[
    serial("author_id"),
    col("name", ColumnKind::Text),
    col("surname", ColumnKind::Text),
];

const COLLECTION_COLUMNS: &[ColumnDef] = &[
    serial("collection_id"),
    col("name", ColumnKind::Text),
    col("type", ColumnKind::Text),
    col("view", ColumnKind::Text),
];

const EDITION_COLUMNS: &[ColumnDef] = &[
    serial("edition_id"),
    col("name", ColumnKind::Text),
    col("branch", ColumnKind::Text),
    col("number_of_pages", ColumnKind::Integer),
    col("languages", ColumnKind::Text),
];

const AUTHOR_EDITION_COLUMNS: &[ColumnDef] = &[
    col("author_id", ColumnKind::Integer),
    col("edition_id", ColumnKind::Integer),
];

const EDITION_COLLECTION_COLUMNS: &[ColumnDef] = &[
    col("edition_id", ColumnKind::Integer),
    col("collection_id", ColumnKind::Integer),
    optional("date", ColumnKind::Date),
];

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Author,
        Table::Collection,
        Table::Edition,
        Table::AuthorEdition,
        Table::EditionCollection,
    ];

    /// The table's name in the database. The names are mixed case, so SQL must use
    /// [`Table::ident`].
    pub fn name(&self) -> &'static str {
        match self {
            Table::Author => "Author",
            Table::Collection => "Collection",
            Table::Edition => "Edition",
            Table::AuthorEdition => "Author_Collection_Edition",
            Table::EditionCollection => "Author_Collection_Edition_ED",
        }
    }

    /// The quoted identifier, ready to splice into a statement.
    pub fn ident(&self) -> &'static str {
        match self {
            Table::Author => r#""Author""#,
            Table::Collection => r#""Collection""#,
            Table::Edition => r#""Edition""#,
            Table::AuthorEdition => r#""Author_Collection_Edition""#,
            Table::EditionCollection => r#""Author_Collection_Edition_ED""#,
        }
    }

    /// The command-line spelling, e.g. `author-edition`.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Table::Author => "author",
            Table::Collection => "collection",
            Table::Edition => "edition",
            Table::AuthorEdition => "author-edition",
            Table::EditionCollection => "edition-collection",
        }
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        match self {
            Table::Author => AUTHOR_COLUMNS,
            Table::Collection => COLLECTION_COLUMNS,
            Table::Edition => EDITION_COLUMNS,
            Table::AuthorEdition => AUTHOR_EDITION_COLUMNS,
            Table::EditionCollection => EDITION_COLLECTION_COLUMNS,
        }
    }

    pub fn primary_key(&self) -> &'static [&'static str] {
        match self {
            Table::Author => &["author_id"],
            Table::Collection => &["collection_id"],
            Table::Edition => &["edition_id"],
            Table::AuthorEdition => &["author_id", "edition_id"],
            Table::EditionCollection => &["edition_id", "collection_id"],
        }
    }

    /// Link tables encode a many-to-many relationship through a composite key.
    pub fn is_link(&self) -> bool {
        matches!(self, Table::AuthorEdition | Table::EditionCollection)
    }

    /// Looks up a column of this table by name.
    pub fn column(&self, name: &str) -> Result<&'static ColumnDef, CoreError> {
        self.columns()
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::UnknownColumn {
                table: self.name().to_string(),
                column: name.to_string(),
            })
    }

    /// Comma-separated column list in declared order, for `SELECT` statements.
    pub fn column_list(&self) -> String {
        self.columns().iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = CoreError;

    /// Accepts the database name (`Author_Collection_Edition`) and the CLI spelling
    /// (`author-edition`, optionally plural), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);
        Table::ALL
            .into_iter()
            .find(|t| {
                normalized == t.name().to_ascii_lowercase().replace('_', "-")
                    || normalized == t.cli_name()
                    || singular == t.cli_name()
            })
            .ok_or_else(|| CoreError::UnknownTable(s.to_string()))
    }
}

impl ColumnKind {
    /// Parses raw text (e.g. from the command line) into a value of this kind.
    /// Text is kept exactly as given; numbers and dates ignore surrounding whitespace.
    pub fn parse(&self, raw: &str) -> Result<Value, CoreError> {
        match self {
            ColumnKind::Integer => raw
                .trim()
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|e| CoreError::InvalidInput(raw.to_string(), e.to_string())),
            ColumnKind::Text => Ok(Value::Text(raw.to_string())),
            ColumnKind::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|e| CoreError::InvalidInput(raw.to_string(), e.to_string())),
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnKind::Integer, Value::Int(_))
                | (ColumnKind::Text, Value::Text(_))
                | (ColumnKind::Date, Value::Date(_))
        )
    }
}

// --- Tag vocabularies used by the data generator ---
// The columns themselves are free text; these are only the values synthetic rows draw from.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Literature,
    Fiction,
    Poetry,
    Science,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Literature,
        Category::Fiction,
        Category::Poetry,
        Category::Science,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Literature => "Literature",
            Category::Fiction => "Fiction",
            Category::Poetry => "Poetry",
            Category::Science => "Science",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Paper,
    Electronic,
}

impl Medium {
    pub const ALL: [Medium; 2] = [Medium::Paper, Medium::Electronic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Medium::Paper => "Paper",
            Medium::Electronic => "Electronic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Fiction,
    Poetry,
    NonFiction,
    Science,
}

impl Branch {
    pub const ALL: [Branch; 4] = [
        Branch::Fiction,
        Branch::Poetry,
        Branch::NonFiction,
        Branch::Science,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Fiction => "Fiction",
            Branch::Poetry => "Poetry",
            Branch::NonFiction => "Non-Fiction",
            Branch::Science => "Science",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Ukrainian,
    French,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Ukrainian, Language::French];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Ukrainian => "Ukrainian",
            Language::French => "French",
        }
    }
}

use crate::enums::Table;
use crate::error::CoreError;
use crate::value::{split_assignment, Value};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Implemented by every persisted row type so it can be listed generically and rendered.
pub trait CatalogRow {
    const TABLE: Table;

    /// Column values as display strings, in declared column order.
    fn cells(&self) -> Vec<String>;
}

// ==============================================================================
// Entity rows
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub author_id: i32,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Collection {
    pub collection_id: i32,
    pub name: String,
    /// Category tag, e.g. "Poetry".
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    /// Medium tag, e.g. "Paper".
    pub view: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Edition {
    pub edition_id: i32,
    pub name: String,
    pub branch: String,
    pub number_of_pages: i32,
    pub languages: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRow, Serialize, Deserialize)]
pub struct AuthorEdition {
    pub author_id: i32,
    pub edition_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct EditionCollection {
    pub edition_id: i32,
    pub collection_id: i32,
    pub date: Option<NaiveDate>,
}

impl CatalogRow for Author {
    const TABLE: Table = Table::Author;

    fn cells(&self) -> Vec<String> {
        vec![self.author_id.to_string(), self.name.clone(), self.surname.clone()]
    }
}

impl CatalogRow for Collection {
    const TABLE: Table = Table::Collection;

    fn cells(&self) -> Vec<String> {
        vec![
            self.collection_id.to_string(),
            self.name.clone(),
            self.kind.clone(),
            self.view.clone(),
        ]
    }
}

impl CatalogRow for Edition {
    const TABLE: Table = Table::Edition;

    fn cells(&self) -> Vec<String> {
        vec![
            self.edition_id.to_string(),
            self.name.clone(),
            self.branch.clone(),
            self.number_of_pages.to_string(),
            self.languages.clone(),
        ]
    }
}

impl CatalogRow for AuthorEdition {
    const TABLE: Table = Table::AuthorEdition;

    fn cells(&self) -> Vec<String> {
        vec![self.author_id.to_string(), self.edition_id.to_string()]
    }
}

impl CatalogRow for EditionCollection {
    const TABLE: Table = Table::EditionCollection;

    fn cells(&self) -> Vec<String> {
        vec![
            self.edition_id.to_string(),
            self.collection_id.to_string(),
            self.date.map(|d| d.to_string()).unwrap_or_else(|| "NULL".to_string()),
        ]
    }
}

/// Every row of one table, as returned by a read-all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogRows {
    Authors(Vec<Author>),
    Collections(Vec<Collection>),
    Editions(Vec<Edition>),
    AuthorEditions(Vec<AuthorEdition>),
    EditionCollections(Vec<EditionCollection>),
}

impl CatalogRows {
    pub fn table(&self) -> Table {
        match self {
            CatalogRows::Authors(_) => Table::Author,
            CatalogRows::Collections(_) => Table::Collection,
            CatalogRows::Editions(_) => Table::Edition,
            CatalogRows::AuthorEditions(_) => Table::AuthorEdition,
            CatalogRows::EditionCollections(_) => Table::EditionCollection,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CatalogRows::Authors(rows) => rows.len(),
            CatalogRows::Collections(rows) => rows.len(),
            CatalogRows::Editions(rows) => rows.len(),
            CatalogRows::AuthorEditions(rows) => rows.len(),
            CatalogRows::EditionCollections(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.table().columns().iter().map(|c| c.name).collect()
    }

    pub fn cells(&self) -> Vec<Vec<String>> {
        fn all<R: CatalogRow>(rows: &[R]) -> Vec<Vec<String>> {
            rows.iter().map(CatalogRow::cells).collect()
        }
        match self {
            CatalogRows::Authors(rows) => all(rows),
            CatalogRows::Collections(rows) => all(rows),
            CatalogRows::Editions(rows) => all(rows),
            CatalogRows::AuthorEditions(rows) => all(rows),
            CatalogRows::EditionCollections(rows) => all(rows),
        }
    }
}

// ==============================================================================
// Insert payloads
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollection {
    pub name: String,
    pub kind: String,
    pub view: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEdition {
    pub name: String,
    pub branch: String,
    pub number_of_pages: i32,
    pub languages: String,
}

/// A row to insert. Link tables carry their complete row; entity tables leave the
/// surrogate key to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewRecord {
    Author(NewAuthor),
    Collection(NewCollection),
    Edition(NewEdition),
    AuthorEdition(AuthorEdition),
    EditionCollection(EditionCollection),
}

impl NewRecord {
    pub fn table(&self) -> Table {
        match self {
            NewRecord::Author(_) => Table::Author,
            NewRecord::Collection(_) => Table::Collection,
            NewRecord::Edition(_) => Table::Edition,
            NewRecord::AuthorEdition(_) => Table::AuthorEdition,
            NewRecord::EditionCollection(_) => Table::EditionCollection,
        }
    }

    /// The supplied `(column, value)` pairs. Absent optional fields are left out so the
    /// insert only names what the caller provided.
    pub fn into_fields(self) -> Vec<(&'static str, Value)> {
        match self {
            NewRecord::Author(a) => vec![("name", a.name.into()), ("surname", a.surname.into())],
            NewRecord::Collection(c) => vec![
                ("name", c.name.into()),
                ("type", c.kind.into()),
                ("view", c.view.into()),
            ],
            NewRecord::Edition(e) => vec![
                ("name", e.name.into()),
                ("branch", e.branch.into()),
                ("number_of_pages", e.number_of_pages.into()),
                ("languages", e.languages.into()),
            ],
            NewRecord::AuthorEdition(l) => vec![
                ("author_id", l.author_id.into()),
                ("edition_id", l.edition_id.into()),
            ],
            NewRecord::EditionCollection(l) => {
                let mut fields = vec![
                    ("edition_id", l.edition_id.into()),
                    ("collection_id", l.collection_id.into()),
                ];
                if let Some(date) = l.date {
                    fields.push(("date", date.into()));
                }
                fields
            }
        }
    }
}

// ==============================================================================
// Update payloads
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPatch {
    pub author_id: Option<i32>,
    pub name: Option<String>,
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionPatch {
    pub collection_id: Option<i32>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditionPatch {
    pub edition_id: Option<i32>,
    pub name: Option<String>,
    pub branch: Option<String>,
    pub number_of_pages: Option<i32>,
    pub languages: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorEditionPatch {
    pub author_id: Option<i32>,
    pub edition_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditionCollectionPatch {
    pub edition_id: Option<i32>,
    pub collection_id: Option<i32>,
    /// `Some(None)` clears the date.
    pub date: Option<Option<NaiveDate>>,
}

/// The changed fields of one table's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    Author(AuthorPatch),
    Collection(CollectionPatch),
    Edition(EditionPatch),
    AuthorEdition(AuthorEditionPatch),
    EditionCollection(EditionCollectionPatch),
}

fn push<T: Into<Value>>(fields: &mut Vec<(&'static str, Value)>, column: &'static str, v: Option<T>) {
    if let Some(v) = v {
        fields.push((column, v.into()));
    }
}

impl Patch {
    /// An empty patch for `table`, to be filled with [`Patch::set`].
    pub fn empty(table: Table) -> Self {
        match table {
            Table::Author => Patch::Author(AuthorPatch::default()),
            Table::Collection => Patch::Collection(CollectionPatch::default()),
            Table::Edition => Patch::Edition(EditionPatch::default()),
            Table::AuthorEdition => Patch::AuthorEdition(AuthorEditionPatch::default()),
            Table::EditionCollection => Patch::EditionCollection(EditionCollectionPatch::default()),
        }
    }

    /// Builds a patch from `column=value` assignments. `NULL` (any case) clears a
    /// nullable column.
    pub fn parse<S: AsRef<str>>(table: Table, assignments: &[S]) -> Result<Self, CoreError> {
        let mut patch = Patch::empty(table);
        for raw in assignments {
            let (column, value) = split_assignment(raw.as_ref())?;
            let def = table.column(column)?;
            let value = if def.nullable && value.trim().eq_ignore_ascii_case("null") {
                Value::Null
            } else {
                def.kind.parse(value)?
            };
            patch.set(column, value)?;
        }
        Ok(patch)
    }

    /// Sets one column, checking that the column exists and the value has its type.
    /// Key columns may be set too; the database decides whether the new key is valid.
    pub fn set(&mut self, column: &str, value: Value) -> Result<(), CoreError> {
        let table = self.table();
        match (self, column, value) {
            (Patch::Author(p), "author_id", Value::Int(v)) => p.author_id = Some(v),
            (Patch::Author(p), "name", Value::Text(v)) => p.name = Some(v),
            (Patch::Author(p), "surname", Value::Text(v)) => p.surname = Some(v),
            (Patch::Collection(p), "collection_id", Value::Int(v)) => p.collection_id = Some(v),
            (Patch::Collection(p), "name", Value::Text(v)) => p.name = Some(v),
            (Patch::Collection(p), "type", Value::Text(v)) => p.kind = Some(v),
            (Patch::Collection(p), "view", Value::Text(v)) => p.view = Some(v),
            (Patch::Edition(p), "edition_id", Value::Int(v)) => p.edition_id = Some(v),
            (Patch::Edition(p), "name", Value::Text(v)) => p.name = Some(v),
            (Patch::Edition(p), "branch", Value::Text(v)) => p.branch = Some(v),
            (Patch::Edition(p), "number_of_pages", Value::Int(v)) => p.number_of_pages = Some(v),
            (Patch::Edition(p), "languages", Value::Text(v)) => p.languages = Some(v),
            (Patch::AuthorEdition(p), "author_id", Value::Int(v)) => p.author_id = Some(v),
            (Patch::AuthorEdition(p), "edition_id", Value::Int(v)) => p.edition_id = Some(v),
            (Patch::EditionCollection(p), "edition_id", Value::Int(v)) => p.edition_id = Some(v),
            (Patch::EditionCollection(p), "collection_id", Value::Int(v)) => p.collection_id = Some(v),
            (Patch::EditionCollection(p), "date", Value::Date(v)) => p.date = Some(Some(v)),
            (Patch::EditionCollection(p), "date", Value::Null) => p.date = Some(None),
            (_, _, value) => {
                let def = table.column(column)?;
                let reason = if value == Value::Null && !def.nullable {
                    "column cannot be NULL".to_string()
                } else {
                    format!("'{value}' does not match the column type")
                };
                return Err(CoreError::InvalidInput(format!("{table}.{column}"), reason));
            }
        }
        Ok(())
    }

    pub fn table(&self) -> Table {
        match self {
            Patch::Author(_) => Table::Author,
            Patch::Collection(_) => Table::Collection,
            Patch::Edition(_) => Table::Edition,
            Patch::AuthorEdition(_) => Table::AuthorEdition,
            Patch::EditionCollection(_) => Table::EditionCollection,
        }
    }

    /// The `(column, value)` pairs that are set, in declared column order.
    pub fn into_fields(self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        match self {
            Patch::Author(p) => {
                push(&mut fields, "author_id", p.author_id);
                push(&mut fields, "name", p.name);
                push(&mut fields, "surname", p.surname);
            }
            Patch::Collection(p) => {
                push(&mut fields, "collection_id", p.collection_id);
                push(&mut fields, "name", p.name);
                push(&mut fields, "type", p.kind);
                push(&mut fields, "view", p.view);
            }
            Patch::Edition(p) => {
                push(&mut fields, "edition_id", p.edition_id);
                push(&mut fields, "name", p.name);
                push(&mut fields, "branch", p.branch);
                push(&mut fields, "number_of_pages", p.number_of_pages);
                push(&mut fields, "languages", p.languages);
            }
            Patch::AuthorEdition(p) => {
                push(&mut fields, "author_id", p.author_id);
                push(&mut fields, "edition_id", p.edition_id);
            }
            Patch::EditionCollection(p) => {
                push(&mut fields, "edition_id", p.edition_id);
                push(&mut fields, "collection_id", p.collection_id);
                push(&mut fields, "date", p.date.map(|d| d.map_or(Value::Null, Value::Date)));
            }
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.clone().into_fields().is_empty()
    }
}

// ==============================================================================
// Advanced search
// ==============================================================================

/// Filters for the author/edition/collection search. All ranges are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Matched case-insensitively anywhere in the author's surname.
    pub surname_pattern: String,
    pub min_pages: i32,
    pub max_pages: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SearchCriteria {
    /// The `ILIKE` operand: the pattern with LIKE metacharacters escaped, wrapped in `%`.
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.surname_pattern.len() + 2);
        escaped.push('%');
        for ch in self.surname_pattern.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }
}

/// One joined row of the advanced search.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SearchHit {
    pub name: String,
    pub surname: String,
    pub edition_name: String,
    pub number_of_pages: i32,
    pub date: Option<NaiveDate>,
    pub collection_name: String,
}

impl SearchHit {
    pub const HEADERS: [&'static str; 6] = [
        "name",
        "surname",
        "edition_name",
        "number_of_pages",
        "date",
        "collection_name",
    ];

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.surname.clone(),
            self.edition_name.clone(),
            self.number_of_pages.to_string(),
            self.date.map(|d| d.to_string()).unwrap_or_else(|| "NULL".to_string()),
            self.collection_name.clone(),
        ]
    }
}

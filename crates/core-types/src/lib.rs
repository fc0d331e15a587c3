//! Shared vocabulary of the catalog: the closed set of tables, their row types,
//! insert and update payloads, and the advanced-search criteria.

pub mod enums;
pub mod error;
pub mod structs;
pub mod value;

// Re-export the core types to provide a clean public API.
pub use enums::{Branch, Category, ColumnDef, ColumnKind, Language, Medium, Table};
pub use error::CoreError;
pub use structs::{
    Author, AuthorEdition, AuthorEditionPatch, AuthorPatch, CatalogRow, CatalogRows, Collection,
    CollectionPatch, Edition, EditionCollection, EditionCollectionPatch, EditionPatch, NewAuthor,
    NewCollection, NewEdition, NewRecord, Patch, SearchCriteria, SearchHit,
};
pub use value::{Condition, Value};

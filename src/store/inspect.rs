//! Catalog queries describing the objects present in a SQLite store.

use super::StoreResult;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::SqliteConnection;

/// Diesel's migration bookkeeping table, excluded from schema listings.
const BOOKKEEPING_TABLE: &str = "__diesel_schema_migrations";

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct SchemaObjectRow {
    #[diesel(sql_type = Text)]
    kind: String,
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ForeignKeyRow {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    target_table: String,
    #[diesel(sql_type = Nullable<Text>)]
    target_column: Option<String>,
    #[diesel(sql_type = Text)]
    on_delete: String,
}

/// A schema object (table, index, trigger, or view) recorded in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaObject {
    /// Object kind as reported by `sqlite_master.type`.
    pub kind: String,
    /// Object name.
    pub name: String,
}

/// A foreign-key reference declared on a table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referencing column.
    pub column: String,
    /// Referenced table.
    pub target_table: String,
    /// Referenced column, when declared explicitly.
    pub target_column: Option<String>,
    /// `ON DELETE` action (`CASCADE`, `SET NULL`, `NO ACTION`, ...).
    pub on_delete: String,
}

/// Lists user tables, sorted by name.
///
/// SQLite internal tables and the migration bookkeeping table are omitted.
///
/// # Errors
///
/// Returns [`super::StoreError::Query`] when the catalog cannot be read.
pub fn table_names(conn: &mut SqliteConnection) -> StoreResult<Vec<String>> {
    let rows = diesel::sql_query(concat!(
        "SELECT name FROM sqlite_master ",
        "WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' AND name <> ? ",
        "ORDER BY name",
    ))
    .bind::<Text, _>(BOOKKEEPING_TABLE)
    .load::<NameRow>(conn)?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

/// Lists explicitly created indexes on `table`, sorted by name.
///
/// Indexes SQLite creates implicitly for primary keys and unique constraints
/// are omitted.
///
/// # Errors
///
/// Returns [`super::StoreError::Query`] when the catalog cannot be read.
pub fn index_names(conn: &mut SqliteConnection, table: &str) -> StoreResult<Vec<String>> {
    let rows = diesel::sql_query(concat!(
        "SELECT name FROM sqlite_master ",
        "WHERE type = 'index' AND tbl_name = ? AND sql IS NOT NULL ",
        "ORDER BY name",
    ))
    .bind::<Text, _>(table)
    .load::<NameRow>(conn)?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

/// Lists every schema object outside the migration bookkeeping table.
///
/// Includes implicit indexes, so an empty result means no table, index,
/// trigger, or view survives.
///
/// # Errors
///
/// Returns [`super::StoreError::Query`] when the catalog cannot be read.
pub fn schema_objects(conn: &mut SqliteConnection) -> StoreResult<Vec<SchemaObject>> {
    let rows = diesel::sql_query(concat!(
        "SELECT type AS kind, name FROM sqlite_master ",
        "WHERE tbl_name <> ? AND tbl_name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ",
        "ORDER BY type, name",
    ))
    .bind::<Text, _>(BOOKKEEPING_TABLE)
    .load::<SchemaObjectRow>(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| SchemaObject {
            kind: row.kind,
            name: row.name,
        })
        .collect())
}

/// Lists the foreign keys declared on `table` in declaration order.
///
/// # Errors
///
/// Returns [`super::StoreError::Query`] when the catalog cannot be read.
pub fn foreign_keys(conn: &mut SqliteConnection, table: &str) -> StoreResult<Vec<ForeignKey>> {
    let rows = diesel::sql_query(concat!(
        "SELECT \"from\" AS column_name, \"table\" AS target_table, ",
        "\"to\" AS target_column, on_delete ",
        "FROM pragma_foreign_key_list(?) ORDER BY id, seq",
    ))
    .bind::<Text, _>(table)
    .load::<ForeignKeyRow>(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| ForeignKey {
            column: row.column_name,
            target_table: row.target_table,
            target_column: row.target_column,
            on_delete: row.on_delete,
        })
        .collect())
}

use anyhow::{Context, Result};
use tracing::warn;

use aisle_types::content::Collection;

use crate::Database;
use crate::models::DocumentRow;
use crate::queries::OptionalExt;

impl Database {
    pub fn insert_document<T: Collection>(&self, item: &T) -> Result<()> {
        let body = serde_json::to_string(item)?;
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO documents (id, collection, index_key, body) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![item.id().to_string(), T::NAME, item.index_key(), body],
            )?;
            Ok(())
        })
    }

    /// Replaces the stored body. Returns false if the id is not in `T`'s collection.
    pub fn update_document<T: Collection>(&self, item: &T) -> Result<bool> {
        let body = serde_json::to_string(item)?;
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE documents
                 SET index_key = ?3, body = ?4, updated_at = datetime('now')
                 WHERE id = ?1 AND collection = ?2",
                rusqlite::params![item.id().to_string(), T::NAME, item.index_key(), body],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_document<T: Collection>(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "DELETE FROM documents WHERE id = ?1 AND collection = ?2",
                rusqlite::params![id, T::NAME],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn get_document<T: Collection>(&self, id: &str) -> Result<Option<T>> {
        let row = self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, collection, index_key, body FROM documents
                 WHERE id = ?1 AND collection = ?2",
                rusqlite::params![id, T::NAME],
                map_document_row,
            )
            .optional()
        })?;

        row.map(|r| decode::<T>(&r)).transpose()
    }

    /// Lists a collection in its display order, optionally narrowed to one
    /// index key. Undecodable bodies are skipped with a warning.
    pub fn list_documents<T: Collection>(&self, index_key: Option<&str>) -> Result<Vec<T>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, collection, index_key, body FROM documents
                 WHERE collection = ?1 AND (?2 IS NULL OR index_key = ?2)",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![T::NAME, index_key], map_document_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        let mut items: Vec<T> = rows
            .iter()
            .filter_map(|row| {
                decode::<T>(row)
                    .map_err(|e| {
                        warn!("Skipping document {} in {}: {:#}", row.id, row.collection, e)
                    })
                    .ok()
            })
            .collect();
        items.sort_by(|a, b| a.display_order(b));
        Ok(items)
    }
}

fn map_document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        collection: row.get(1)?,
        index_key: row.get(2)?,
        body: row.get(3)?,
    })
}

fn decode<T: Collection>(row: &DocumentRow) -> Result<T> {
    let mut item: T = serde_json::from_str(&row.body)
        .with_context(|| format!("bad {} body under key '{}'", row.collection, row.index_key))?;
    if let Ok(id) = row.id.parse() {
        item.set_id(id);
    }
    Ok(item)
}

//! Snapshot persistence
//!
//! Stores serialized navigation trees under a restoration key so an
//! application can rebuild its scenes on the next launch.

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use serde::{de::DeserializeOwned, Serialize};

use crate::database::Database;
use crate::error::StorageError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub restoration_key: String,
    pub document: String,
    pub scene_count: usize,
    pub saved_at: DateTime<Utc>,
}

impl StoredSnapshot {
    /// Decode the stored document into a concrete snapshot type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.document)?)
    }
}

#[derive(Clone)]
pub struct SnapshotStore {
    db: Database,
}

impl SnapshotStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Save (or replace) the snapshot for a restoration key
    pub fn save<T: Serialize>(
        &self,
        restoration_key: &str,
        snapshot: &T,
        scene_count: usize,
    ) -> Result<StoredSnapshot> {
        let document = serde_json::to_string(snapshot)?;
        let saved_at = Utc::now();

        self.db.write(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO snapshots (restoration_key, document, scene_count, saved_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    restoration_key,
                    document,
                    scene_count as i64,
                    saved_at.to_rfc3339()
                ],
            )?;
            Ok(())
        })?;

        tracing::debug!(
            restoration_key = %restoration_key,
            scene_count,
            "Saved navigation snapshot"
        );

        Ok(StoredSnapshot {
            restoration_key: restoration_key.to_string(),
            document,
            scene_count,
            saved_at,
        })
    }

    /// Load the snapshot for a restoration key, if one was saved
    pub fn load(&self, restoration_key: &str) -> Result<Option<StoredSnapshot>> {
        let row = self.db.read(|conn| {
            let row = conn
                .query_row(
                    "SELECT document, scene_count, saved_at FROM snapshots
                     WHERE restoration_key = ?1",
                    [restoration_key],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;
            Ok(row)
        })?;

        let Some((document, scene_count, saved_str)) = row else {
            return Ok(None);
        };

        let saved_at = DateTime::parse_from_rfc3339(&saved_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StorageError::InvalidTimestamp {
                key: restoration_key.to_string(),
                value: saved_str.clone(),
            })?;

        Ok(Some(StoredSnapshot {
            restoration_key: restoration_key.to_string(),
            document,
            scene_count: scene_count.max(0) as usize,
            saved_at,
        }))
    }

    /// Delete the snapshot for a restoration key; missing keys are not an error
    pub fn delete(&self, restoration_key: &str) -> Result<()> {
        self.db.write(|conn| {
            conn.execute(
                "DELETE FROM snapshots WHERE restoration_key = ?1",
                [restoration_key],
            )?;
            Ok(())
        })
    }

    /// All restoration keys, most recently saved first
    pub fn keys(&self) -> Result<Vec<String>> {
        self.db.read(|conn| {
            let mut stmt =
                conn.prepare("SELECT restoration_key FROM snapshots ORDER BY saved_at DESC")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(keys)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        paths: Vec<String>,
    }

    #[test]
    fn test_snapshot_store() {
        let store = SnapshotStore::new(Database::open_in_memory().unwrap());
        assert!(store.load("main").unwrap().is_none());

        let doc = Doc {
            paths: vec!["home".to_string(), "page2".to_string()],
        };
        store.save("main", &doc, 2).unwrap();

        let loaded = store.load("main").unwrap().unwrap();
        assert_eq!(loaded.scene_count, 2);
        assert_eq!(loaded.decode::<Doc>().unwrap(), doc);
        assert_eq!(store.keys().unwrap(), vec!["main".to_string()]);

        store.delete("main").unwrap();
        store.delete("main").unwrap();
        assert!(store.load("main").unwrap().is_none());
    }

    #[test]
    fn test_keys_reports_unreadable_rows() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            conn.execute(
                "INSERT INTO snapshots (restoration_key, document, saved_at) VALUES (NULL, '{}', 'now')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let store = SnapshotStore::new(db);
        assert!(store.keys().is_err());
    }
}

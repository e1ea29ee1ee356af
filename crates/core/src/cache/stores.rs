//! Store registry operations on the SQLite backend.

use async_trait::async_trait;
use tokio_rusqlite::params;

use super::connection::CacheDb;
use super::entries::SqliteStore;
use super::CacheStorage;
use crate::Error;

#[async_trait]
impl CacheStorage for CacheDb {
    type Store = SqliteStore;

    async fn open(&self, name: &str) -> Result<SqliteStore, Error> {
        if name.is_empty() {
            return Err(Error::InvalidInput("cache store name must not be empty".into()));
        }

        let store_name = name.to_string();
        let created = self
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let inserted = conn.execute(
                    "INSERT OR IGNORE INTO cache_stores (name, created_at) VALUES (?1, ?2)",
                    params![store_name, chrono::Utc::now().to_rfc3339()],
                )?;
                Ok(inserted > 0)
            })
            .await
            .map_err(Error::from)?;

        if created {
            tracing::debug!(store = name, "created cache store");
        }

        Ok(SqliteStore::new(self.clone(), name))
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM cache_stores ORDER BY rowid ASC")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        let store_name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM cache_stores WHERE name = ?1", params![store_name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }
}

impl CacheDb {
    /// Number of entries held by a store (0 if it does not exist).
    pub async fn entry_count(&self, name: &str) -> Result<u64, Error> {
        let store_name = name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM cache_entries WHERE store = ?1",
                    params![store_name],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

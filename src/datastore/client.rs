/// Project-scoped datastore client
///
/// Each project gets its own database file: {data_dir}/{project}/datastore.db
/// The client owns a connection pool and is built once at startup, then cloned
/// into request handlers.

use crate::{config::DatastoreConfig, datastore::key::Key};
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row, Sqlite,
};
use std::{path::Path, str::FromStr, time::Duration};

/// How long a connection waits on another writer's lock before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pooled handle to one project's entity store
#[derive(Debug, Clone)]
pub struct DatastoreClient {
    pool: SqlitePool,
    project: String,
}

impl DatastoreClient {
    /// Open (or create) the project's database and initialise the schema
    pub async fn connect(config: &DatastoreConfig) -> Result<Self> {
        let project_dir = Path::new(&config.data_dir).join(&config.project);
        std::fs::create_dir_all(&project_dir).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create project directory '{}': {}",
                project_dir.display(),
                e
            )
        })?;
        let db_path = project_dir.join("datastore.db");

        tracing::info!("🗄️ Opening datastore pool: {}", db_path.display());

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let client = Self {
            pool,
            project: config.project.clone(),
        };
        client.init_schema().await?;

        tracing::info!("✅ Datastore ready for project '{}'", client.project);

        Ok(client)
    }

    /// Ephemeral store living in a single in-memory connection
    ///
    /// The pool is pinned to one connection that never expires, otherwise
    /// SQLite would hand out a fresh empty database per connection.
    pub async fn in_memory(project: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let client = Self {
            pool,
            project: project.to_string(),
        };
        client.init_schema().await?;
        Ok(client)
    }

    /// Project this client is scoped to
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Create the entities table. Safe to call multiple times.
    async fn init_schema(&self) -> Result<()> {
        // AUTOINCREMENT keeps ids of deleted entities from being handed out again
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                properties JSON NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_entities_kind ON entities(kind)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fetch every entity of a kind, in key order
    pub async fn get_all<T: DeserializeOwned>(&self, kind: &str) -> Result<Vec<(Key, T)>> {
        let rows = sqlx::query("SELECT id, properties FROM entities WHERE kind = ? ORDER BY id")
            .bind(kind)
            .fetch_all(&self.pool)
            .await?;

        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            let key = Key::id_key(kind, row.get("id"));
            let properties: String = row.get("properties");
            let entity = decode(&key, &properties)?;
            entities.push((key, entity));
        }

        Ok(entities)
    }

    /// Read a single entity by key
    pub async fn get<T: DeserializeOwned>(&self, key: &Key) -> Result<Option<T>> {
        let row = sqlx::query("SELECT properties FROM entities WHERE kind = ? AND id = ?")
            .bind(&key.kind)
            .bind(key.id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let properties: String = row.get("properties");
                Ok(Some(decode(key, &properties)?))
            }
            None => Ok(None),
        }
    }

    /// Write a new entity under a store-assigned key
    pub async fn put_new<T: Serialize>(&self, kind: &str, entity: &T) -> Result<Key> {
        let properties = serde_json::to_string(entity)?;

        let result = sqlx::query("INSERT INTO entities (kind, properties) VALUES (?, ?)")
            .bind(kind)
            .bind(&properties)
            .execute(&self.pool)
            .await?;

        Ok(Key::id_key(kind, result.last_insert_rowid()))
    }

    /// Delete an entity by key, reporting whether it existed
    pub async fn delete(&self, key: &Key) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entities WHERE kind = ? AND id = ?")
            .bind(&key.kind)
            .bind(key.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Open a transaction. It rolls back unless [`Transaction::commit`] is called.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`). A deferred
    /// transaction that reads first and upgrades later gets SQLITE_BUSY without
    /// waiting when another writer holds the lock.
    pub async fn begin(&self) -> Result<Transaction> {
        Ok(Transaction {
            inner: self.pool.begin_with("BEGIN IMMEDIATE").await?,
        })
    }

    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }
}

/// An open datastore transaction
pub struct Transaction {
    inner: sqlx::Transaction<'static, Sqlite>,
}

impl Transaction {
    /// Read an entity inside the transaction
    pub async fn get<T: DeserializeOwned>(&mut self, key: &Key) -> Result<Option<T>> {
        let row = sqlx::query("SELECT properties FROM entities WHERE kind = ? AND id = ?")
            .bind(&key.kind)
            .bind(key.id)
            .fetch_optional(&mut *self.inner)
            .await?;

        match row {
            Some(row) => {
                let properties: String = row.get("properties");
                Ok(Some(decode(key, &properties)?))
            }
            None => Ok(None),
        }
    }

    /// Overwrite an existing entity inside the transaction
    pub async fn put<T: Serialize>(&mut self, key: &Key, entity: &T) -> Result<()> {
        let properties = serde_json::to_string(entity)?;

        let result = sqlx::query(
            r#"
            UPDATE entities
            SET properties = ?, updated_at = CURRENT_TIMESTAMP
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(&properties)
        .bind(&key.kind)
        .bind(key.id)
        .execute(&mut *self.inner)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Entity not found: {}", key));
        }

        Ok(())
    }

    pub async fn commit(self) -> Result<()> {
        self.inner.commit().await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(key: &Key, properties: &str) -> Result<T> {
    serde_json::from_str(properties)
        .map_err(|e| anyhow::anyhow!("Failed to decode entity {}: {}", key, e))
}

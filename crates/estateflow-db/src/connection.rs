//! Embedded SurrealDB connection management.
//!
//! All state lives in a local, single-process store: a RocksDB-backed
//! database file for normal operation, or a transient in-memory engine
//! for tests. There is no server and no remote endpoint.

use std::path::PathBuf;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use tracing::info;

/// Configuration for the local store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Filesystem path of the database directory.
    pub path: PathBuf,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("estateflow.db"),
            namespace: "estateflow".into(),
            database: "main".into(),
        }
    }
}

/// Manages the embedded SurrealDB instance.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Db>,
}

impl DbManager {
    /// Open (or create) the file-backed store at the configured path
    /// and select the configured namespace and database.
    pub async fn open(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            path = %config.path.display(),
            namespace = %config.namespace,
            database = %config.database,
            "Opening local store"
        );

        let endpoint = config.path.to_string_lossy().into_owned();
        let db = Surreal::new::<RocksDb>(endpoint.as_str()).await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Local store ready");

        Ok(Self { db })
    }

    /// Transient in-memory store; nothing survives the process.
    pub async fn memory() -> Result<Self, surrealdb::Error> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns("estateflow").use_db("main").await?;
        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Db> {
        &self.db
    }
}

use crate::domain::{IngestRun, Orbit};
use crate::error::{Result, ScraperError};
use crate::storage::OrbitStore;
use async_trait::async_trait;
use libsql::{Builder, Connection, Database};
use std::env;
use tracing::{debug, info};
use uuid::Uuid;

pub struct DatabaseManager {
    db: Database,
}

impl DatabaseManager {
    /// Create a new database manager with connection to Turso
    pub async fn new() -> Result<Self> {
        let url = env::var("LIBSQL_URL").map_err(|_| ScraperError::Database {
            message: "LIBSQL_URL environment variable not set".to_string(),
        })?;

        let auth_token = env::var("LIBSQL_AUTH_TOKEN").map_err(|_| ScraperError::Database {
            message: "LIBSQL_AUTH_TOKEN environment variable not set".to_string(),
        })?;

        info!("Connecting to Turso database at {}", url);

        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| ScraperError::Database {
                message: format!("Failed to connect to database: {e}"),
            })?;

        Ok(Self { db })
    }

    /// Get a connection to the database
    pub async fn get_connection(&self) -> Result<Connection> {
        self.db.connect().map_err(|e| ScraperError::Database {
            message: format!("Failed to get database connection: {e}"),
        })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        let conn = self.get_connection().await?;
        let migration_sql = include_str!("../migrations/001_create_orbits_and_runs.sql");

        conn.execute_batch(migration_sql)
            .await
            .map_err(|e| ScraperError::Database {
                message: format!("Failed to run migrations: {e}"),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

/// Database storage implementation using Turso/libSQL. Each orbit row keeps
/// the queryable identifiers as columns and the full entity as JSON, so the
/// schema survives feed additions without a migration.
pub struct DatabaseStorage {
    db: DatabaseManager,
}

impl DatabaseStorage {
    pub async fn new() -> Result<Self> {
        let db = DatabaseManager::new().await?;
        db.run_migrations().await?;
        Ok(Self { db })
    }

    fn orbit_to_row_data(orbit: &Orbit) -> Result<String> {
        serde_json::to_string(orbit).map_err(|e| ScraperError::Database {
            message: format!("Failed to serialize orbit: {e}"),
        })
    }

    fn row_data_to_orbit(id: &str, data: &str) -> Result<Orbit> {
        let mut orbit: Orbit = serde_json::from_str(data).map_err(|e| ScraperError::Database {
            message: format!("Failed to deserialize orbit: {e}"),
        })?;
        orbit.id = Some(Uuid::parse_str(id).map_err(|e| ScraperError::Database {
            message: format!("Invalid orbit UUID: {e}"),
        })?);
        Ok(orbit)
    }

    async fn collect_orbits(mut rows: libsql::Rows) -> Result<Vec<Orbit>> {
        let mut orbits = Vec::new();
        while let Some(row) = rows.next().await.map_err(|e| ScraperError::Database {
            message: format!("Failed to read orbit row: {e}"),
        })? {
            let id: String = row.get(0).map_err(|e| ScraperError::Database {
                message: format!("Failed to read orbit id: {e}"),
            })?;
            let data: String = row.get(1).map_err(|e| ScraperError::Database {
                message: format!("Failed to read orbit data: {e}"),
            })?;
            orbits.push(Self::row_data_to_orbit(&id, &data)?);
        }
        Ok(orbits)
    }
}

#[async_trait]
impl OrbitStore for DatabaseStorage {
    async fn create_orbit(&self, orbit: &mut Orbit) -> Result<()> {
        let id = Uuid::new_v4();
        orbit.id = Some(id);

        let conn = self.db.get_connection().await?;
        let data = Self::orbit_to_row_data(orbit)?;

        conn.execute(
            "INSERT INTO orbits (id, norad_cat_id, object_name, epoch, data) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                orbit.norad_cat_id,
                orbit.object_name.clone(),
                orbit.epoch.to_rfc3339(),
                data
            ],
        )
        .await
        .map_err(|e| ScraperError::Database {
            message: format!("Failed to insert orbit: {e}"),
        })?;

        debug!("Inserted orbit {} with id {}", orbit.object_name, id);
        Ok(())
    }

    async fn get_all_orbits(&self) -> Result<Vec<Orbit>> {
        let conn = self.db.get_connection().await?;
        let rows = conn
            .query("SELECT id, data FROM orbits ORDER BY rowid", ())
            .await
            .map_err(|e| ScraperError::Database {
                message: format!("Failed to query orbits: {e}"),
            })?;
        Self::collect_orbits(rows).await
    }

    async fn get_orbits_by_norad_id(&self, norad_cat_id: i64) -> Result<Vec<Orbit>> {
        let conn = self.db.get_connection().await?;
        let rows = conn
            .query(
                "SELECT id, data FROM orbits WHERE norad_cat_id = ? ORDER BY rowid",
                libsql::params![norad_cat_id],
            )
            .await
            .map_err(|e| ScraperError::Database {
                message: format!("Failed to query orbits by NORAD id: {e}"),
            })?;
        Self::collect_orbits(rows).await
    }

    async fn create_ingest_run(&self, run: &mut IngestRun) -> Result<()> {
        let id = Uuid::new_v4();
        run.id = Some(id);

        let conn = self.db.get_connection().await?;
        conn.execute(
            "INSERT INTO ingest_runs (id, name, created_at, finished_at, records_fetched, records_persisted, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                run.name.clone(),
                run.created_at.to_rfc3339(),
                run.finished_at.map(|t| t.to_rfc3339()),
                run.records_fetched,
                run.records_persisted,
                run.status.as_str()
            ],
        )
        .await
        .map_err(|e| ScraperError::Database {
            message: format!("Failed to insert ingest run: {e}"),
        })?;

        debug!("Inserted ingest run {} with id {}", run.name, id);
        Ok(())
    }

    async fn update_ingest_run(&self, run: &IngestRun) -> Result<()> {
        let run_id = run.id.ok_or_else(|| ScraperError::Database {
            message: "Cannot update ingest run without ID".to_string(),
        })?;

        let conn = self.db.get_connection().await?;
        conn.execute(
            "UPDATE ingest_runs SET finished_at = ?, records_fetched = ?, records_persisted = ?, status = ? \
             WHERE id = ?",
            libsql::params![
                run.finished_at.map(|t| t.to_rfc3339()),
                run.records_fetched,
                run.records_persisted,
                run.status.as_str(),
                run_id.to_string()
            ],
        )
        .await
        .map_err(|e| ScraperError::Database {
            message: format!("Failed to update ingest run: {e}"),
        })?;

        Ok(())
    }
}

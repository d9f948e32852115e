use crate::domain::{IngestRun, Orbit};
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Storage trait for persisting catalog data. One `create_orbit` call per
/// fetched record, in catalog order; the store is the sole source of
/// uniqueness and history (no dedup happens upstream).
#[async_trait]
pub trait OrbitStore: Send + Sync {
    // Orbit operations
    async fn create_orbit(&self, orbit: &mut Orbit) -> Result<()>;
    async fn get_all_orbits(&self) -> Result<Vec<Orbit>>;
    async fn get_orbits_by_norad_id(&self, norad_cat_id: i64) -> Result<Vec<Orbit>>;

    // Ingest run operations
    async fn create_ingest_run(&self, run: &mut IngestRun) -> Result<()>;
    async fn update_ingest_run(&self, run: &IngestRun) -> Result<()>;
}

/// In-memory storage implementation for development/testing. Orbits are kept
/// in insertion order so callers can observe persistence order.
pub struct InMemoryStorage {
    orbits: Arc<Mutex<Vec<Orbit>>>,
    runs: Arc<Mutex<Vec<IngestRun>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            orbits: Arc::new(Mutex::new(Vec::new())),
            runs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn ingest_runs(&self) -> Vec<IngestRun> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrbitStore for InMemoryStorage {
    async fn create_orbit(&self, orbit: &mut Orbit) -> Result<()> {
        let id = Uuid::new_v4();
        orbit.id = Some(id);

        let mut orbits = self.orbits.lock().unwrap();
        orbits.push(orbit.clone());

        debug!("Created orbit {} with id {}", orbit.object_name, id);
        Ok(())
    }

    async fn get_all_orbits(&self) -> Result<Vec<Orbit>> {
        Ok(self.orbits.lock().unwrap().clone())
    }

    async fn get_orbits_by_norad_id(&self, norad_cat_id: i64) -> Result<Vec<Orbit>> {
        let orbits = self.orbits.lock().unwrap();
        Ok(orbits
            .iter()
            .filter(|o| o.norad_cat_id == norad_cat_id)
            .cloned()
            .collect())
    }

    async fn create_ingest_run(&self, run: &mut IngestRun) -> Result<()> {
        let id = Uuid::new_v4();
        run.id = Some(id);

        let mut runs = self.runs.lock().unwrap();
        runs.push(run.clone());

        debug!("Created ingest run {} with id {}", run.name, id);
        Ok(())
    }

    async fn update_ingest_run(&self, run: &IngestRun) -> Result<()> {
        let run_id = run.id.ok_or_else(|| ScraperError::Database {
            message: "Cannot update ingest run without ID".to_string(),
        })?;

        let mut runs = self.runs.lock().unwrap();
        match runs.iter_mut().find(|r| r.id == Some(run_id)) {
            Some(existing) => {
                *existing = run.clone();
                debug!("Updated ingest run {} with id {}", run.name, run_id);
                Ok(())
            }
            None => Err(ScraperError::Database {
                message: format!("No ingest run with id {run_id}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RunStatus;

    fn orbit(norad_cat_id: i64, name: &str) -> Orbit {
        Orbit {
            id: None,
            ordinal: 1,
            comment: None,
            originator: "18 SPCS".into(),
            norad_cat_id,
            object_name: name.into(),
            object_type: Some("PAYLOAD".into()),
            classification_type: "U".into(),
            intldes: "19074B".into(),
            object_id: "2019-074B".into(),
            object_number: Some(norad_cat_id),
            file: 1,
            epoch: chrono::Utc::now(),
            epoch_microseconds: 0,
            mean_motion: 15.05,
            eccentricity: 0.0001,
            inclination: 53.05,
            ra_of_asc_node: 245.8,
            arg_of_pericenter: 83.1,
            mean_anomaly: 276.9,
            semimajor_axis: 6925.2,
            period: 95.6,
            apogee: 548.1,
            perigee: 546.1,
            bstar: 0.0002,
            mean_motion_dot: 1.4e-5,
            mean_motion_ddot: 0.0,
            tle_line0: format!("0 {name}"),
            tle_line1: "1 ...".into(),
            tle_line2: "2 ...".into(),
            ephemeris_type: 0,
            element_set_no: 999,
            rev_at_epoch: 6716,
            decayed: Some(0),
        }
    }

    #[tokio::test]
    async fn orbits_keep_insertion_order_and_duplicates() {
        let store = InMemoryStorage::new();
        for name in ["STARLINK-1007", "STARLINK-1008", "STARLINK-1007"] {
            let mut o = orbit(44713, name);
            store.create_orbit(&mut o).await.unwrap();
            assert!(o.id.is_some());
        }

        let all = store.get_all_orbits().await.unwrap();
        let names: Vec<_> = all.iter().map(|o| o.object_name.as_str()).collect();
        assert_eq!(names, ["STARLINK-1007", "STARLINK-1008", "STARLINK-1007"]);

        let by_norad = store.get_orbits_by_norad_id(44713).await.unwrap();
        assert_eq!(by_norad.len(), 3);
    }

    #[tokio::test]
    async fn ingest_runs_can_be_updated() {
        let store = InMemoryStorage::new();
        let mut run = IngestRun::started("space_track");
        store.create_ingest_run(&mut run).await.unwrap();

        run.records_fetched = 2;
        run.records_persisted = 2;
        run.finish(RunStatus::Completed);
        store.update_ingest_run(&run).await.unwrap();

        let runs = store.ingest_runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Completed);
        assert!(runs[0].finished_at.is_some());
    }

    #[tokio::test]
    async fn updating_an_unsaved_run_is_an_error() {
        let store = InMemoryStorage::new();
        let run = IngestRun::started("space_track");
        assert!(store.update_ingest_run(&run).await.is_err());
    }
}

use crate::apis::space_track::{authenticate, close_session, fetch_catalog, CatalogTransport};
use crate::catalog::{map_record, parse_catalog};
use crate::config::Config;
use crate::constants::SPACE_TRACK_API;
use crate::domain::{IngestRun, RunStatus};
use crate::error::Result;
use crate::snapshot;
use crate::storage::OrbitStore;
use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Result of a complete ingest run
#[derive(Debug, Serialize)]
pub struct IngestReport {
    pub api_name: String,
    pub records_fetched: usize,
    pub records_persisted: usize,
    pub snapshot_sha256: String,
    /// The fixed progress lines, in emission order
    pub progress: Vec<String>,
}

fn progress(lines: &mut Vec<String>, message: &str) {
    println!("{message}");
    lines.push(message.to_string());
}

pub struct Pipeline;

impl Pipeline {
    /// Run the complete ingest sequence: authenticate, fetch, archive the
    /// snapshot, map-then-persist each record in catalog order, close the
    /// session. The transport and store are supplied by the caller, so
    /// nothing here touches process-wide state.
    ///
    /// The first failure terminates the run; the session is still closed on
    /// that path and the run record is marked failed.
    #[instrument(skip(config, transport, store))]
    pub async fn run(
        config: &Config,
        transport: &dyn CatalogTransport,
        store: Arc<dyn OrbitStore>,
    ) -> Result<IngestReport> {
        let mut progress_lines = Vec::new();
        progress(&mut progress_lines, "Starting API request.....");
        counter!("spacetrack_ingest_runs_total", "api" => SPACE_TRACK_API).increment(1);

        let mut run_record = IngestRun::started(SPACE_TRACK_API);
        store.create_ingest_run(&mut run_record).await?;

        let outcome = Self::ingest(config, transport, store.clone(), &mut run_record).await;
        // the session closes on every exit path before the result propagates
        close_session(transport).await;

        match outcome {
            Ok((fetched, persisted, checksum)) => {
                run_record.finish(RunStatus::Completed);
                store.update_ingest_run(&run_record).await?;

                counter!("spacetrack_orbits_persisted_total", "api" => SPACE_TRACK_API)
                    .increment(persisted as u64);
                info!("persisted {} of {} fetched records", persisted, fetched);

                progress(&mut progress_lines, "Completed API session.....");
                progress(&mut progress_lines, "Complete");

                Ok(IngestReport {
                    api_name: SPACE_TRACK_API.to_string(),
                    records_fetched: fetched,
                    records_persisted: persisted,
                    snapshot_sha256: checksum,
                    progress: progress_lines,
                })
            }
            Err(e) => {
                error!("ingest failed: {e}");
                run_record.finish(RunStatus::Failed);
                // best effort; the original error is the one worth surfacing
                let _ = store.update_ingest_run(&run_record).await;
                Err(e)
            }
        }
    }

    async fn ingest(
        config: &Config,
        transport: &dyn CatalogTransport,
        store: Arc<dyn OrbitStore>,
        run_record: &mut IngestRun,
    ) -> Result<(usize, usize, String)> {
        authenticate(transport, &config.credentials()).await?;

        let t_fetch = std::time::Instant::now();
        let payload = fetch_catalog(transport).await?;
        histogram!("spacetrack_fetch_duration_seconds", "api" => SPACE_TRACK_API)
            .record(t_fetch.elapsed().as_secs_f64());

        let checksum = snapshot::archive_payload(&config.output, &payload)?;

        let records = parse_catalog(&payload)?;
        run_record.records_fetched = records.len() as i64;
        histogram!("spacetrack_records_per_run", "api" => SPACE_TRACK_API)
            .record(records.len() as f64);

        let mut persisted = 0usize;
        for raw in &records {
            // a malformed record aborts the whole run, no partial ingestion
            let mut orbit = map_record(raw)?;
            store.create_orbit(&mut orbit).await?;
            persisted += 1;
            run_record.records_persisted = persisted as i64;
        }

        Ok((records.len(), persisted, checksum))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login credentials for the catalog service
#[derive(Clone)]
pub struct Credentials {
    pub identity: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    // keep the password out of logs and error chains
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One row of orbital/catalog data for a tracked object, as returned by the
/// tle_latest class. Field names follow the remote schema, snake_cased.
///
/// One instance per catalog record per run; uniqueness and history live in
/// the persistence layer, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub id: Option<Uuid>,

    // Identifiers
    pub ordinal: i64,
    pub comment: Option<String>,
    pub originator: String,
    pub norad_cat_id: i64,
    pub object_name: String,
    pub object_type: Option<String>,
    pub classification_type: String,
    pub intldes: String,
    pub object_id: String,
    pub object_number: Option<i64>,
    pub file: i64,

    // Epoch
    pub epoch: DateTime<Utc>,
    pub epoch_microseconds: i64,

    // Keplerian/TLE elements
    pub mean_motion: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ra_of_asc_node: f64,
    pub arg_of_pericenter: f64,
    pub mean_anomaly: f64,

    // Derived parameters, provided by the feed
    pub semimajor_axis: f64,
    pub period: f64,
    pub apogee: f64,
    pub perigee: f64,

    // Perturbation terms
    pub bstar: f64,
    pub mean_motion_dot: f64,
    pub mean_motion_ddot: f64,

    // Raw element text
    pub tle_line0: String,
    pub tle_line1: String,
    pub tle_line2: String,

    // Bookkeeping
    pub ephemeris_type: i64,
    pub element_set_no: i64,
    pub rev_at_epoch: i64,
    pub decayed: Option<i64>,
}

/// Outcome of one ingest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

/// Bookkeeping record for one execution of the ingest pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRun {
    pub id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub records_fetched: i64,
    pub records_persisted: i64,
    pub status: RunStatus,
}

impl IngestRun {
    pub fn started(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            created_at: Utc::now(),
            finished_at: None,
            records_fetched: 0,
            records_persisted: 0,
            status: RunStatus::Running,
        }
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.finished_at = Some(Utc::now());
        self.status = status;
    }
}

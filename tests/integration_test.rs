use async_trait::async_trait;
use spacetrack_scraper::apis::space_track::{CatalogTransport, HttpReply};
use spacetrack_scraper::config::Config;
use spacetrack_scraper::domain::{Credentials, RunStatus};
use spacetrack_scraper::error::{Result as ScraperResult, ScraperError};
use spacetrack_scraper::pipeline::Pipeline;
use spacetrack_scraper::storage::{InMemoryStorage, OrbitStore};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const PROGRESS_LINES: [&str; 3] = [
    "Starting API request.....",
    "Completed API session.....",
    "Complete",
];

/// Canned-reply transport standing in for www.space-track.org
struct FakeTransport {
    login_status: u16,
    catalog_status: u16,
    catalog_body: Vec<u8>,
    logout_calls: AtomicUsize,
}

impl FakeTransport {
    fn new(login_status: u16, catalog_status: u16, catalog_body: &[u8]) -> Self {
        Self {
            login_status,
            catalog_status,
            catalog_body: catalog_body.to_vec(),
            logout_calls: AtomicUsize::new(0),
        }
    }

    fn logouts(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogTransport for FakeTransport {
    async fn post_login(&self, _credentials: &Credentials) -> ScraperResult<HttpReply> {
        Ok(HttpReply {
            status: self.login_status,
            body: b"login reply".to_vec(),
        })
    }

    async fn get_catalog(&self, _query_path: &str) -> ScraperResult<HttpReply> {
        Ok(HttpReply {
            status: self.catalog_status,
            body: self.catalog_body.clone(),
        })
    }

    async fn get_logout(&self) -> ScraperResult<HttpReply> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Ok(HttpReply {
            status: 200,
            body: Vec::new(),
        })
    }
}

const CATALOG_HEADER: &str = "ORDINAL,COMMENT,ORIGINATOR,NORAD_CAT_ID,OBJECT_NAME,OBJECT_TYPE,\
CLASSIFICATION_TYPE,INTLDES,EPOCH,EPOCH_MICROSECONDS,MEAN_MOTION,ECCENTRICITY,INCLINATION,\
RA_OF_ASC_NODE,ARG_OF_PERICENTER,MEAN_ANOMALY,EPHEMERIS_TYPE,ELEMENT_SET_NO,REV_AT_EPOCH,\
BSTAR,MEAN_MOTION_DOT,MEAN_MOTION_DDOT,FILE,TLE_LINE0,TLE_LINE1,TLE_LINE2,OBJECT_ID,\
OBJECT_NUMBER,SEMIMAJOR_AXIS,PERIOD,APOGEE,PERIGEE,DECAYED";

fn catalog_row(norad_cat_id: i64, object_name: &str, mean_motion: &str) -> String {
    format!(
        "1,,18 SPCS,{norad_cat_id},{object_name},PAYLOAD,U,19074A,2021-01-26 10:24:00,0,\
{mean_motion},0.0001102,53.0542,233.8265,74.0138,286.1977,0,999,6715,0.00022,1.2e-05,0,\
2947172,0 {object_name},1 {norad_cat_id}U 19074A   21026.43333333,2 {norad_cat_id}  53.0542,\
2019-074A,{norad_cat_id},6925.3,95.65,547.9,546.4,0"
    )
}

fn two_record_catalog() -> String {
    format!(
        "{CATALOG_HEADER}\n{}\n{}\n",
        catalog_row(44713, "STARLINK-1007", "15.05569391"),
        catalog_row(44714, "STARLINK-1008", "15.05585487"),
    )
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        username: "alice".to_string(),
        password: "hunter2".to_string(),
        output: dir.path().join("snapshots").join("catalog.csv"),
    }
}

#[tokio::test]
async fn run_persists_each_record_in_catalog_order() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let payload = two_record_catalog();
    let transport = FakeTransport::new(200, 200, payload.as_bytes());
    let store = Arc::new(InMemoryStorage::new());

    let report = Pipeline::run(&config, &transport, store.clone())
        .await
        .unwrap();

    assert_eq!(report.records_fetched, 2);
    assert_eq!(report.records_persisted, 2);
    assert_eq!(report.progress, PROGRESS_LINES);

    let orbits = store.get_all_orbits().await.unwrap();
    assert_eq!(orbits.len(), 2);
    assert_eq!(orbits[0].object_name, "STARLINK-1007");
    assert_eq!(orbits[1].object_name, "STARLINK-1008");
    assert_eq!(orbits[0].norad_cat_id, 44713);
    assert!(orbits.iter().all(|o| o.id.is_some()));

    // the raw payload was archived verbatim before persistence
    assert_eq!(fs::read(&config.output).unwrap(), payload.as_bytes());

    // the session was closed exactly once, and the run record completed
    assert_eq!(transport.logouts(), 1);
    let runs = store.ingest_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Completed);
    assert_eq!(runs[0].records_persisted, 2);
}

#[tokio::test]
async fn rejected_catalog_query_surfaces_fetch_error_and_persists_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let transport = FakeTransport::new(200, 401, b"unauthorized");
    let store = Arc::new(InMemoryStorage::new());

    let err = Pipeline::run(&config, &transport, store.clone())
        .await
        .unwrap_err();

    match err {
        ScraperError::Fetch { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("expected Fetch error, got {other:?}"),
    }

    assert!(store.get_all_orbits().await.unwrap().is_empty());
    // the session still closed on the failure path
    assert_eq!(transport.logouts(), 1);
    assert_eq!(store.ingest_runs()[0].status, RunStatus::Failed);
}

#[tokio::test]
async fn rejected_login_surfaces_authentication_error() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let transport = FakeTransport::new(500, 200, two_record_catalog().as_bytes());
    let store = Arc::new(InMemoryStorage::new());

    let err = Pipeline::run(&config, &transport, store.clone())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScraperError::Authentication { status: 500, .. }
    ));
    assert!(store.get_all_orbits().await.unwrap().is_empty());
    assert_eq!(transport.logouts(), 1);
}

#[tokio::test]
async fn running_twice_persists_the_same_records_twice() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let payload = two_record_catalog();
    let transport = FakeTransport::new(200, 200, payload.as_bytes());
    let store = Arc::new(InMemoryStorage::new());

    Pipeline::run(&config, &transport, store.clone())
        .await
        .unwrap();
    Pipeline::run(&config, &transport, store.clone())
        .await
        .unwrap();

    // no dedup: history is the persistence layer's concern
    let orbits = store.get_all_orbits().await.unwrap();
    let names: Vec<_> = orbits.iter().map(|o| o.object_name.as_str()).collect();
    assert_eq!(
        names,
        ["STARLINK-1007", "STARLINK-1008", "STARLINK-1007", "STARLINK-1008"]
    );
    assert_eq!(store.ingest_runs().len(), 2);
}

#[tokio::test]
async fn malformed_record_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    // second row carries an unparseable mean motion
    let payload = format!(
        "{CATALOG_HEADER}\n{}\n{}\n",
        catalog_row(44713, "STARLINK-1007", "15.05569391"),
        catalog_row(44714, "STARLINK-1008", "not-a-number"),
    );
    let transport = FakeTransport::new(200, 200, payload.as_bytes());
    let store = Arc::new(InMemoryStorage::new());

    let err = Pipeline::run(&config, &transport, store.clone())
        .await
        .unwrap_err();

    match err {
        ScraperError::Schema { field, .. } => assert_eq!(field, "MEAN_MOTION"),
        other => panic!("expected Schema error, got {other:?}"),
    }

    // records ahead of the malformed one were already written, in order
    let orbits = store.get_all_orbits().await.unwrap();
    assert_eq!(orbits.len(), 1);
    assert_eq!(orbits[0].object_name, "STARLINK-1007");
    assert_eq!(store.ingest_runs()[0].status, RunStatus::Failed);
    assert_eq!(transport.logouts(), 1);
}

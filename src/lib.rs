pub mod apis;
pub mod catalog;
pub mod config;
pub mod constants;
#[cfg(feature = "db")]
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod snapshot;
pub mod storage;

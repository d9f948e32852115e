//! Catalog payload decoding and the raw-record -> Orbit mapping boundary.

mod mapper;
mod parse;

pub use mapper::map_record;
pub use parse::parse_catalog;

/// One raw catalog record: a JSON object mapping CSV column names to their
/// unparsed string values, in header order.
pub type RawOrbitRecord = serde_json::Value;

use super::RawOrbitRecord;
use crate::error::Result;
use serde_json::Value;
use tracing::debug;

/// Decode the catalog CSV payload (header row plus data rows) into raw
/// records, preserving payload order. The body is parsed per its declared
/// format before anything iterates it; a truncated or ragged payload is a
/// `Csv` error, not a silent short read.
pub fn parse_catalog(payload: &[u8]) -> Result<Vec<RawOrbitRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(payload);

    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = serde_json::Map::with_capacity(headers.len());
        for (column, value) in headers.iter().zip(row.iter()) {
            record.insert(column.to_string(), Value::String(value.to_string()));
        }
        records.push(Value::Object(record));
    }

    debug!("decoded {} catalog records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_one_record_per_row_in_order() {
        let payload = b"NORAD_CAT_ID,OBJECT_NAME\n44713,STARLINK-1007\n44714,STARLINK-1008\n44716,STARLINK-1010\n";
        let records = parse_catalog(payload).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["OBJECT_NAME"], "STARLINK-1007");
        assert_eq!(records[1]["OBJECT_NAME"], "STARLINK-1008");
        assert_eq!(records[2]["NORAD_CAT_ID"], "44716");
    }

    #[test]
    fn empty_payload_yields_no_records() {
        let records = parse_catalog(b"NORAD_CAT_ID,OBJECT_NAME\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let payload = b"NORAD_CAT_ID,OBJECT_NAME\n44713\n";
        assert!(parse_catalog(payload).is_err());
    }
}

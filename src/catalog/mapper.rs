use super::RawOrbitRecord;
use crate::domain::Orbit;
use crate::error::{Result, ScraperError};
use chrono::{DateTime, NaiveDateTime, Utc};

// The feed renders epochs a couple of ways depending on the output format
// requested; accept all of them.
const EPOCH_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn required<'a>(raw: &'a RawOrbitRecord, field: &str) -> Result<&'a str> {
    raw[field]
        .as_str()
        .ok_or_else(|| ScraperError::MissingField(field.to_string()))
}

fn required_string(raw: &RawOrbitRecord, field: &str) -> Result<String> {
    required(raw, field).map(str::to_string)
}

/// Optional columns map an absent key or an empty cell to `None`
fn optional_string(raw: &RawOrbitRecord, field: &str) -> Option<String> {
    raw[field]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required_f64(raw: &RawOrbitRecord, field: &str) -> Result<f64> {
    let text = required(raw, field)?;
    text.trim().parse().map_err(|e| ScraperError::Schema {
        field: field.to_string(),
        message: format!("'{text}' is not a number: {e}"),
    })
}

fn required_i64(raw: &RawOrbitRecord, field: &str) -> Result<i64> {
    let text = required(raw, field)?;
    text.trim().parse().map_err(|e| ScraperError::Schema {
        field: field.to_string(),
        message: format!("'{text}' is not an integer: {e}"),
    })
}

fn optional_i64(raw: &RawOrbitRecord, field: &str) -> Result<Option<i64>> {
    match optional_string(raw, field) {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|e| ScraperError::Schema {
                field: field.to_string(),
                message: format!("'{text}' is not an integer: {e}"),
            }),
    }
}

fn required_epoch(raw: &RawOrbitRecord, field: &str) -> Result<DateTime<Utc>> {
    let text = required(raw, field)?;
    for format in EPOCH_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text.trim(), format) {
            return Ok(parsed.and_utc());
        }
    }
    Err(ScraperError::Schema {
        field: field.to_string(),
        message: format!("'{text}' is not a recognized epoch timestamp"),
    })
}

/// Map one raw catalog record into an `Orbit` by exact column-name match.
///
/// Pure and total over well-formed records: a missing required column fails
/// with `MissingField`, an unparseable value with `Schema`, and nothing is
/// defaulted. `COMMENT`, `OBJECT_TYPE`, `OBJECT_NUMBER`, and `DECAYED` are
/// the only columns the feed leaves empty for some objects.
pub fn map_record(raw: &RawOrbitRecord) -> Result<Orbit> {
    Ok(Orbit {
        id: None,

        ordinal: required_i64(raw, "ORDINAL")?,
        comment: optional_string(raw, "COMMENT"),
        originator: required_string(raw, "ORIGINATOR")?,
        norad_cat_id: required_i64(raw, "NORAD_CAT_ID")?,
        object_name: required_string(raw, "OBJECT_NAME")?,
        object_type: optional_string(raw, "OBJECT_TYPE"),
        classification_type: required_string(raw, "CLASSIFICATION_TYPE")?,
        intldes: required_string(raw, "INTLDES")?,
        object_id: required_string(raw, "OBJECT_ID")?,
        object_number: optional_i64(raw, "OBJECT_NUMBER")?,
        file: required_i64(raw, "FILE")?,

        epoch: required_epoch(raw, "EPOCH")?,
        epoch_microseconds: required_i64(raw, "EPOCH_MICROSECONDS")?,

        mean_motion: required_f64(raw, "MEAN_MOTION")?,
        eccentricity: required_f64(raw, "ECCENTRICITY")?,
        inclination: required_f64(raw, "INCLINATION")?,
        ra_of_asc_node: required_f64(raw, "RA_OF_ASC_NODE")?,
        arg_of_pericenter: required_f64(raw, "ARG_OF_PERICENTER")?,
        mean_anomaly: required_f64(raw, "MEAN_ANOMALY")?,

        semimajor_axis: required_f64(raw, "SEMIMAJOR_AXIS")?,
        period: required_f64(raw, "PERIOD")?,
        apogee: required_f64(raw, "APOGEE")?,
        perigee: required_f64(raw, "PERIGEE")?,

        bstar: required_f64(raw, "BSTAR")?,
        mean_motion_dot: required_f64(raw, "MEAN_MOTION_DOT")?,
        mean_motion_ddot: required_f64(raw, "MEAN_MOTION_DDOT")?,

        tle_line0: required_string(raw, "TLE_LINE0")?,
        tle_line1: required_string(raw, "TLE_LINE1")?,
        tle_line2: required_string(raw, "TLE_LINE2")?,

        ephemeris_type: required_i64(raw, "EPHEMERIS_TYPE")?,
        element_set_no: required_i64(raw, "ELEMENT_SET_NO")?,
        rev_at_epoch: required_i64(raw, "REV_AT_EPOCH")?,
        decayed: optional_i64(raw, "DECAYED")?,
    })
}

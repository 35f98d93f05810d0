//! Serde helpers for the naive datetime format used by every CSV and table.
//!
//! Datetimes are stored and exchanged as `YYYY-MM-DD HH:MM:SS` without a zone.
//! Use with `#[serde(with = "wf_core::datetime::naive")]` on struct fields.
//!
//! # Example
//! ```ignore
//! use chrono::NaiveDateTime;
//! use wf_core::datetime;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Record {
//!     #[serde(with = "datetime::naive")]
//!     pub recorded_at: NaiveDateTime,
//!
//!     #[serde(default, with = "datetime::naive_option")]
//!     pub ended_at: Option<NaiveDateTime>,
//! }
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// The single datetime layout accepted in CSV files and SQL columns.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a datetime in [`FORMAT`].
#[must_use]
pub fn format(dt: &NaiveDateTime) -> String {
    dt.format(FORMAT).to_string()
}

/// Parse a datetime in [`FORMAT`].
///
/// # Errors
///
/// Returns `chrono::ParseError` if `s` does not match the layout.
pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), FORMAT)
}

#[allow(clippy::wildcard_imports)]
pub mod naive {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid datetime '{raw}': {e}")))
    }
}

/// Optional variant: an empty field deserializes to `None`.
#[allow(clippy::wildcard_imports, clippy::ref_option)]
pub mod naive_option {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    pub fn serialize<S: Serializer>(dt: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_some(&format(dt)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => parse(&raw).map(Some).map_err(|e| {
                serde::de::Error::custom(format!("invalid datetime '{raw}': {e}"))
            }),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_csv_layout() {
        let dt = parse("2020-05-12 04:13:07").unwrap();
        assert_eq!(dt.year(), 2020);
        assert_eq!(dt.month(), 5);
        assert_eq!(dt.day(), 12);
        assert_eq!(dt.hour(), 4);
        assert_eq!(dt.second(), 7);
    }

    #[test]
    fn format_is_inverse_of_parse() {
        let raw = "2018-07-03 20:32:28";
        assert_eq!(format(&parse(raw).unwrap()), raw);
    }

    #[test]
    fn rejects_iso_t_separator() {
        assert!(parse("2020-05-12T04:13:07").is_err());
    }
}

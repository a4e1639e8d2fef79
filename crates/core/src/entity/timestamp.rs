//! Entity timestamps.
//!
//! OPL encodes instants as exactly 20 ASCII bytes in ISO-8601 "Z" form
//! (`2016-03-04T12:34:56Z`); an empty field means "unset". [`Timestamp`]
//! models both states.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// The one timestamp shape OPL accepts. The trailing `Z` is a literal;
/// the offset is always UTC.
const TIMESTAMP_FORMAT: &[FormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// An instant in UTC, or the unset sentinel.
///
/// `Display` renders the 20-byte wire form for set timestamps and the
/// empty string for unset ones. Parsing accepts exactly the wire form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp(Option<OffsetDateTime>);

impl Timestamp {
    /// Wrap an instant.
    pub fn new(instant: OffsetDateTime) -> Self {
        Self(Some(instant))
    }

    /// True iff this timestamp holds an instant.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// The instant, if set.
    pub fn get(&self) -> Option<OffsetDateTime> {
        self.0
    }
}

impl FromStr for Timestamp {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = PrimitiveDateTime::parse(s, TIMESTAMP_FORMAT)?;
        Ok(Self(Some(parsed.assume_utc())))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(instant) => {
                let rendered = instant
                    .format(TIMESTAMP_FORMAT)
                    .map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
            None => Ok(()),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(_) => serializer.serialize_some(&self.to_string()),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => text.parse().map_err(D::Error::custom),
            None => Ok(Self(None)),
        }
    }
}

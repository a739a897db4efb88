use std::fmt;

use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Timezone used to render timestamps for display.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimeZone {
    /// The timezone of the host running the process.
    #[default]
    Local,
    /// A named IANA timezone.
    Named(Tz),
}

impl TimeZone {
    /// Parses `local` (or an empty string) and IANA timezone names.
    pub fn parse(tz: &str) -> Option<Self> {
        match tz {
            "" | "local" => Some(Self::Local),
            _ => tz.parse::<Tz>().ok().map(Self::Named),
        }
    }

    /// Shifts a UTC instant into this timezone, keeping only the offset.
    pub fn to_fixed_offset(self, timestamp: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => timestamp.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => timestamp.with_timezone(&tz).fixed_offset(),
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl std::str::FromStr for TimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("{s:?} is not a valid timezone"))
    }
}

impl Serialize for TimeZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tz = String::deserialize(deserializer)?;
        Self::parse(&tz).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Str(&tz), &"`local` or a valid IANA timezone")
        })
    }
}

//! Lenient parsing of milestone instants.
//!
//! Milestone records come from hand-edited files and CMS exports, so a date
//! that cannot be read is treated as "not scheduled yet" instead of failing
//! the whole record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserializer;
use std::fmt;

/// Key the `toml` crate uses when handing a native datetime to serde.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an instant from text.
///
/// Accepts RFC 3339, naive date-times (read as UTC) and plain `YYYY-MM-DD`
/// dates (midnight UTC). Returns `None` for anything else.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// serde `deserialize_with` helper for optional milestone instants.
///
/// Never fails on content: unreadable values deserialize to `None`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientInstantVisitor)
}

struct LenientInstantVisitor;

impl LenientInstantVisitor {
    fn discard<E>(kind: &str) -> Result<Option<DateTime<Utc>>, E> {
        tracing::warn!(kind, "ignoring milestone date that is not a string");
        Ok(None)
    }
}

impl<'de> Visitor<'de> for LenientInstantVisitor {
    type Value = Option<DateTime<Utc>>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a date, a date-time, or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let parsed = parse_instant(v);
        if parsed.is_none() && !v.trim().is_empty() {
            tracing::warn!(value = v, "ignoring unparseable milestone date");
        }
        Ok(parsed)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Self::discard("bool")
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Self::discard("integer")
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Self::discard("integer")
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Self::discard("float")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Self::discard("array")
    }

    // TOML native datetimes arrive as a single-entry map.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut found = None;
        let mut saw_datetime = false;
        while let Some(key) = map.next_key::<String>()? {
            if key == TOML_DATETIME_KEY {
                let raw: String = map.next_value()?;
                saw_datetime = true;
                found = parse_instant(&raw);
                if found.is_none() {
                    tracing::warn!(value = %raw, "ignoring TOML datetime without a date part");
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        if saw_datetime {
            Ok(found)
        } else {
            Self::discard("table")
        }
    }
}

//! Snowflake ID - 64-bit time-ordered identifier for submissions, audit entries and applications
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Time-ordered 64-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Worker that issued the identifier
    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) & i64::from(MAX_WORKER_ID)) as u16
    }

    /// Issue time encoded in the high bits
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let millis = (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) + Self::EPOCH;
        Utc.timestamp_millis_opt(millis).single()
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialized as a string so browser clients never lose precision
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer identifier")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Snowflake, E> {
                Ok(Snowflake(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Snowflake, E> {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| de::Error::custom("identifier out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Snowflake, E> {
                Snowflake::parse(value).map_err(|_| de::Error::custom("invalid identifier string"))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// Largest worker id that fits the layout
pub const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;

/// Issues identifiers for one worker.
///
/// The last issued `(millis, sequence)` pair lives in a single atomic word,
/// so concurrent callers either advance it together or retry.
pub struct SnowflakeGenerator {
    worker_id: u16,
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// # Panics
    /// Panics if `worker_id` exceeds [`MAX_WORKER_ID`]
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id <= MAX_WORKER_ID, "worker id out of range");
        Self {
            worker_id,
            state: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let last_ms = current >> SEQUENCE_BITS;
            let now = millis_since_epoch().max(last_ms);

            let next = if now > last_ms {
                now << SEQUENCE_BITS
            } else if current & SEQUENCE_MASK < SEQUENCE_MASK {
                current + 1
            } else {
                // Sequence exhausted for this millisecond; borrow the next one
                (last_ms + 1) << SEQUENCE_BITS
            };

            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return self.compose(next),
                Err(actual) => current = actual,
            }
        }
    }

    fn compose(&self, state: i64) -> Snowflake {
        let millis = state >> SEQUENCE_BITS;
        let sequence = state & SEQUENCE_MASK;
        Snowflake::new(
            (millis << (WORKER_BITS + SEQUENCE_BITS))
                | (i64::from(self.worker_id) << SEQUENCE_BITS)
                | sequence,
        )
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

fn millis_since_epoch() -> i64 {
    Utc::now().timestamp_millis() - Snowflake::EPOCH
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_parse_and_display() {
        let sf = Snowflake::parse(" 123456789 ").unwrap();
        assert_eq!(sf.into_inner(), 123_456_789);
        assert_eq!(sf.to_string(), "123456789");
        assert!(Snowflake::parse("game-42").is_err());
    }

    #[test]
    fn test_json_string_roundtrip() {
        let sf = Snowflake::new(123_456_789_012_345_678);
        let json = serde_json::to_string(&sf).unwrap();
        assert_eq!(json, "\"123456789012345678\"");

        let from_number: Snowflake = serde_json::from_str("12345").unwrap();
        assert_eq!(from_number, Snowflake::new(12345));
    }

    #[test]
    fn test_generator_ids_are_unique_and_monotonic() {
        let gen = SnowflakeGenerator::new(7);
        let mut last = Snowflake::new(0);
        for _ in 0..1000 {
            let id = gen.generate();
            assert!(id > last);
            assert_eq!(id.worker_id(), 7);
            last = id;
        }
    }

    #[test]
    fn test_generator_thread_safety() {
        let gen = Arc::new(SnowflakeGenerator::new(1));
        let ids = Arc::new(std::sync::Mutex::new(HashSet::new()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = Arc::clone(&gen);
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    let local: Vec<_> = (0..500).map(|_| gen.generate()).collect();
                    ids.lock().unwrap().extend(local);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ids.lock().unwrap().len(), 2000);
    }

    #[test]
    fn test_generated_id_carries_issue_time() {
        let before = Utc::now() - chrono::Duration::seconds(1);
        let id = SnowflakeGenerator::new(3).generate();
        let created = id.created_at().unwrap();
        assert!(created >= before);
        assert!(created <= Utc::now() + chrono::Duration::seconds(1));
    }

    #[test]
    #[should_panic(expected = "worker id out of range")]
    fn test_generator_invalid_worker_id() {
        SnowflakeGenerator::new(MAX_WORKER_ID + 1);
    }
}

//! Serde adapters for std types used in settings files

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// (De)serialize a [`Duration`] as whole milliseconds
///
/// # Usage
/// ```rust
/// use std::time::Duration;
///
/// use convointel_common::duration_millis;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Interval {
///     #[serde(with = "duration_millis")]
///     every: Duration,
/// }
/// ```
pub mod duration_millis {
    use super::*;

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Write the duration as a `u64` millisecond count, saturating on overflow
    pub fn serialize<S>(duration: &Duration, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    /// Read a `u64` millisecond count
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

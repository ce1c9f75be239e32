//! Serde support for `chrono::Duration`, stored as whole seconds.

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = i64::deserialize(deserializer)?;
    Ok(Duration::seconds(secs))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Wrapper {
        #[serde(with = "crate::core::time")]
        elapsed: Duration,
    }

    #[test]
    fn test_duration_stored_as_seconds() {
        let w = Wrapper {
            elapsed: Duration::hours(2),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"elapsed":7200}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }
}

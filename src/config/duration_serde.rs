//! Serde helpers for human-readable durations in configuration.

use serde::{Deserialize, Deserializer, Serializer, de};
use std::time::Duration;

/// Duration written as a humantime string (`"500ms"`, `"2s"`) and read from
/// either such a string or a whole number of milliseconds.
pub mod duration {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Millis(u64),
        Text(String),
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDuration::deserialize(deserializer)? {
            RawDuration::Millis(millis) => Ok(Duration::from_millis(millis)),
            RawDuration::Text(text) => humantime::parse_duration(text.trim())
                .map_err(|e| de::Error::custom(format!("Invalid duration '{text}': {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super::duration")]
        delay: Duration,
    }

    #[test]
    fn test_number_is_milliseconds() {
        let holder: Holder = toml::from_str("delay = 250").unwrap();
        assert_eq!(holder.delay, Duration::from_millis(250));
    }

    #[test]
    fn test_humantime_string() {
        let holder: Holder = toml::from_str("delay = \"1s 500ms\"").unwrap();
        assert_eq!(holder.delay, Duration::from_millis(1500));
        assert_eq!(toml::to_string(&holder).unwrap().trim(), "delay = \"1s 500ms\"");
    }

    #[test]
    fn test_negative_number_is_rejected() {
        assert!(toml::from_str::<Holder>("delay = -5").is_err());
    }
}

//! Small helpers shared across the crate

/// Serde adapter that stores a [`std::time::Duration`] as integer seconds.
///
/// Use with `#[serde(with = "crate::utils::duration_secs")]`; sub-second
/// precision is not preserved, which is fine for the coarse policy windows
/// configured here.
pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Window {
        #[serde(with = "super::duration_secs")]
        ttl: Duration,
    }

    #[test]
    fn test_duration_round_trips_as_seconds() {
        let window = Window {
            ttl: Duration::from_secs(90),
        };
        let toml = toml::to_string(&window).unwrap();
        assert_eq!(toml.trim(), "ttl = 90");

        let back: Window = toml::from_str(&toml).unwrap();
        assert_eq!(back, window);
    }

    #[test]
    fn test_subsecond_precision_is_dropped() {
        let window = Window {
            ttl: Duration::from_millis(1500),
        };
        let toml = toml::to_string(&window).unwrap();
        assert_eq!(toml.trim(), "ttl = 1");
    }
}

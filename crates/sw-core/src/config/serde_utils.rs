//! Shared serialization/deserialization utilities for configuration

/// Optional `Duration` written as a humantime string (`"24h"`, `"90m"`)
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Config {
///     #[serde(default, with = "sw_core::config::serde_utils::opt_duration_human")]
///     warning: Option<Duration>,
/// }
/// ```
pub mod opt_duration_human {
    use serde::{de::Error, Deserialize, Deserializer};
    use std::time::Duration;

    /// Deserialize an optional Duration from a humantime string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .map(|s| crate::config::parse_duration(&s).map_err(D::Error::custom))
            .transpose()
    }
}

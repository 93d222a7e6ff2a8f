use serde::{Deserialize, Serialize};

/// On-disk shape of the settings file before validation.
///
/// ```toml
/// start = "22:00"
/// end = "09:00"
/// idle_minutes = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_minutes: Option<u32>,
}

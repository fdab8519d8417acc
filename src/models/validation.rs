use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Validation profile requested by the caller.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, AsRefStr, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValidationMode {
    /// Reject below 90% certainty or on any quality defect.
    #[default]
    Estricto,
    /// Accept from 70% certainty, flagged with a warning marker.
    Flexible,
}

/// Body of `POST /api/validar-vehiculo`.
///
/// Missing or null image fields deserialize as empty strings so they are
/// reported as `IMAGES_REQUIRED` instead of a deserialization failure. `mode` is kept raw
/// so an unknown value can be reported as `INVALID_MODE`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vehicle_image: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub plate_image: String,

    #[serde(default)]
    pub mode: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata appended to every successful verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ResultMetadata {
    pub mode: ValidationMode,
    pub timestamp: String,
    pub version: String,
}

impl ResultMetadata {
    pub fn new(mode: ValidationMode, at: DateTime<Utc>) -> Self {
        Self {
            mode,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

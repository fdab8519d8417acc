use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Shape the model is instructed to answer with.
///
/// The endpoint relays the model's JSON untouched; this view is only read
/// leniently for logging and metrics. A field that does not fit the documented
/// shape reads as `None` without affecting its siblings, and unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationVerdict {
    #[serde(default, deserialize_with = "lenient")]
    pub imagenes_analizadas: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub modo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub valido: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub razon: Option<String>,
    #[serde(default, deserialize_with = "lenient_findings")]
    pub detalle: Vec<ImageFinding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageFinding {
    #[serde(default, deserialize_with = "lenient")]
    pub tipo: Option<ImageKind>,
    #[serde(default, deserialize_with = "lenient")]
    pub certeza: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub placa_legible: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub marca_modelo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub checklist: Option<QualityChecklist>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Vehiculo,
    Placa,
    Rechazado,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityChecklist {
    #[serde(default, deserialize_with = "lenient")]
    pub nitidez: Option<QualityLevel>,
    #[serde(default, deserialize_with = "lenient")]
    pub iluminacion: Option<QualityLevel>,
    #[serde(default, deserialize_with = "lenient")]
    pub objeto_completo: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub adecuado_para_sistema: Option<bool>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Alta,
    Media,
    Baja,
}

/// Read any JSON value and keep it only if it fits `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).ok())
}

/// Keep the findings that are objects; drop anything else.
fn lenient_findings<'de, D>(deserializer: D) -> Result<Vec<ImageFinding>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .filter_map(|item| ImageFinding::deserialize(item).ok())
        .collect())
}

impl ValidationVerdict {
    /// Best-effort read of a model answer. A non-object yields an empty verdict.
    pub fn summarize(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    /// Number of findings the model classified as rejected.
    pub fn rejected_images(&self) -> usize {
        self.detalle
            .iter()
            .filter(|f| f.tipo == Some(ImageKind::Rechazado))
            .count()
    }

    pub fn outcome_label(&self) -> &'static str {
        match self.valido {
            Some(true) => "valid",
            Some(false) => "invalid",
            None => "unknown",
        }
    }
}

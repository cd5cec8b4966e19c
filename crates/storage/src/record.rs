use anyhow::{ensure, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// One capture directory, flattened for the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    /// `<date>/<captureName>`
    pub id: String,
    pub date: String,
    pub raw_url: String,
    pub processed_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<String>,
}

impl Capture {
    pub fn new(
        date: &str,
        name: &str,
        raw_url: String,
        processed_url: String,
        metadata: CaptureMetadata,
    ) -> Self {
        Self {
            id: format!("{date}/{name}"),
            date: date.to_string(),
            raw_url,
            processed_url,
            title: metadata.title.unwrap_or_default(),
            description: metadata.description.unwrap_or_default(),
            tags: metadata.tags.unwrap_or_default(),
            location: metadata.location.unwrap_or_default(),
            exposure_time: metadata.exposure_time,
            focal_length: metadata.focal_length,
            pixel_size: metadata.pixel_size,
        }
    }
}

/// Contents of an optional `metadata.json`.
///
/// Fields are read independently: a `null` or wrong-typed value reads as
/// absent without affecting the other fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureMetadata {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub exposure_time: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub focal_length: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub pixel_size: Option<String>,
}

impl CaptureMetadata {
    /// Fails only on invalid JSON or a root that is not an object.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        ensure!(value.is_object(), "metadata root is not a JSON object");
        Ok(serde_json::from_value(value)?)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

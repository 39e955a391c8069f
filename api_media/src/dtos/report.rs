use notify::UploadedImageInfo;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrText {
    Id(i32),
    Text(String),
}

/// Record ids arrive as numbers or numeric strings; anything else reads as 0,
/// which never matches a row.
fn record_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(match IdOrText::deserialize(deserializer)? {
        IdOrText::Id(id) => id,
        IdOrText::Text(text) => text.trim().parse().unwrap_or(0),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfRequest {
    #[serde(deserialize_with = "record_id")]
    pub bmi_record_id: i32,
    #[serde(default)]
    pub uploaded_image_info: Option<UploadedImageInfo>,
}

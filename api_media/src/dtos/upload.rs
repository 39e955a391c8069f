use common::error::{AppError, Res};
use notify::UploadedImageInfo;
use serde::Serialize;

pub const MAX_IMAGE_BYTES: usize = notify::images::MAX_MARKETING_IMAGE_BYTES;
pub const TOO_LARGE: &str = "File too large. Maximum size is 5MB";

const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

#[derive(Debug, Clone)]
pub struct ImagePart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields collected from the multipart body.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub image: Option<ImagePart>,
    pub category: Option<String>,
    pub customer_name: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug)]
pub struct ValidUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: String,
    pub category: String,
    pub customer_name: String,
    pub customer_id: String,
}

impl ValidUpload {
    /// `{category}-{customerId}-{millis}.{ext}`
    pub fn object_name(&self, millis: i64) -> String {
        format!(
            "{}-{}-{}.{}",
            self.category, self.customer_id, millis, self.extension
        )
    }
}

/// Extension from the client file name, else from the MIME subtype.
fn extension(file_name: Option<&str>, content_type: &str) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| match content_type {
            "image/jpeg" | "image/jpg" => "jpg".to_string(),
            other => other.trim_start_matches("image/").to_string(),
        })
}

impl UploadForm {
    pub fn validate(self) -> Res<ValidUpload> {
        let Some(image) = self.image.filter(|i| !i.bytes.is_empty()) else {
            return Err(AppError::BadRequest("No image provided".to_string()));
        };
        if image.bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(TOO_LARGE.to_string()));
        }

        let content_type = image.content_type.unwrap_or_default().to_ascii_lowercase();
        if !ALLOWED_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::BadRequest(
                "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed".to_string(),
            ));
        }

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::BadRequest("Category is required".to_string()))?;
        if category.contains(['/', '\\']) {
            return Err(AppError::BadRequest("Invalid category".to_string()));
        }

        Ok(ValidUpload {
            extension: extension(image.file_name.as_deref(), &content_type),
            bytes: image.bytes,
            content_type,
            category,
            customer_name: self.customer_name.unwrap_or_default(),
            customer_id: self
                .customer_id
                .filter(|id| !id.contains(['/', '\\']))
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub info: UploadedImageInfo,
}

/// One entry of the uploaded image listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub name: String,
    pub url: String,
    pub category: String,
    pub updated_at: Option<String>,
}

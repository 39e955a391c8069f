use common::error::Res;
use notify::{UploadedImageInfo, images::newest_first, ports::ImageSource};
use storage::{BucketOptions, ListOptions, StorageClient};

use crate::dtos::upload::{
    MAX_IMAGE_BYTES, UploadResponse, UploadedImage, ValidUpload,
};

/// Replaces the marketing image of `upload.category` and returns where the
/// new one is served from.
///
/// Only one image per category is kept: earlier `{category}-` objects are
/// removed first. Cleanup and bucket creation are best effort.
pub async fn store_image(
    storage: &StorageClient,
    bucket: &str,
    upload: ValidUpload,
    millis: i64,
) -> Res<UploadResponse> {
    let objects = storage.from(bucket);
    let prefix = format!("{}-", upload.category);

    match objects.list("", ListOptions::new().search(&prefix)).await {
        Ok(files) => {
            let stale: Vec<String> = files
                .into_iter()
                .map(|f| f.name)
                .filter(|name| name.starts_with(&prefix))
                .collect();
            if !stale.is_empty() {
                match objects.remove(&stale).await {
                    Ok(()) => log::info!("Removed {} old {} image(s)", stale.len(), upload.category),
                    Err(e) => log::warn!("Could not remove old images: {}", e),
                }
            }
        }
        Err(e) => log::warn!("Could not list old images: {}", e),
    }

    let options = BucketOptions {
        public: true,
        allowed_mime_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        file_size_limit: Some(MAX_IMAGE_BYTES as u64),
    };
    if let Err(e) = storage.create_bucket(bucket, options).await {
        // usually "already exists"
        log::debug!("Bucket {} not created: {}", bucket, e);
    }

    let name = upload.object_name(millis);
    objects
        .upload(&name, upload.bytes, &upload.content_type)
        .await?;
    log::info!("Uploaded marketing image {}", name);

    Ok(UploadResponse {
        success: true,
        info: UploadedImageInfo {
            category: upload.category,
            file_path: Some(objects.get_public_url(&name)),
            customer_name: Some(upload.customer_name),
            customer_id: Some(upload.customer_id),
        },
    })
}

/// Stored marketing images, newest first. Empty when the store is unreachable.
pub async fn list_images(source: &dyn ImageSource) -> Vec<UploadedImage> {
    match source.list(None).await {
        Ok(images) => newest_first(images)
            .into_iter()
            .map(|image| UploadedImage {
                category: image.category().to_string(),
                name: image.name,
                url: image.url,
                updated_at: image.updated_at,
            })
            .collect(),
        Err(e) => {
            log::error!("Error reading uploaded images: {}", e);
            Vec::new()
        }
    }
}

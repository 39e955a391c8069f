use std::sync::Arc;

use actix_multipart::{Field, Multipart};
use actix_web::{Responder, get, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
};
use futures::StreamExt;
use notify::NotificationPipeline;
use storage::StorageClient;

use crate::{
    dtos::upload::{ImagePart, MAX_IMAGE_BYTES, TOO_LARGE, UploadForm},
    services,
};

// text fields are short; anything bigger is not a form value
const MAX_TEXT_BYTES: usize = 1024;

async fn read_field(field: &mut Field, limit: usize, too_large: &str) -> Res<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(too_large.to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field) -> Res<String> {
    let bytes = read_field(field, MAX_TEXT_BYTES, "Form field too long").await?;
    String::from_utf8(bytes).map_err(|_| AppError::BadRequest("Invalid form field".to_string()))
}

async fn read_form(mut payload: Multipart) -> Res<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let bytes = read_field(&mut field, MAX_IMAGE_BYTES, TOO_LARGE).await?;
                form.image = Some(ImagePart {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "category" => form.category = Some(read_text(&mut field).await?),
            "customerName" => form.customer_name = Some(read_text(&mut field).await?),
            "customerId" => form.customer_id = Some(read_text(&mut field).await?),
            _ => {
                read_field(&mut field, MAX_IMAGE_BYTES, TOO_LARGE).await?;
            }
        }
    }

    Ok(form)
}

/// Uploads the marketing image for a customer category.
///
/// # Input
/// - multipart: `image` (file), `category`, `customerName`, `customerId`
///
/// # Output
/// - Success: `{ success, filePath, category, customerName, customerId }`
/// - Error: 400 on a missing, oversized or non-image file
#[post("/upload-image")]
pub async fn post_upload_image(
    claims: web::ReqData<JwtClaims>,
    storage: web::Data<Arc<StorageClient>>,
    config: web::Data<Arc<Config>>,
    payload: Multipart,
) -> Res<impl Responder> {
    let upload = read_form(payload).await?.validate()?;
    log::info!(
        "{} uploading {} image for {}",
        claims.username,
        upload.category,
        upload.customer_id
    );

    let millis = chrono::Utc::now().timestamp_millis();
    let res =
        services::upload::store_image(&storage, &config.storage.bucket, upload, millis).await?;
    Success::ok(res)
}

#[get("/uploaded-images")]
pub async fn get_uploaded_images(
    pipeline: web::Data<Arc<NotificationPipeline>>,
) -> Res<impl Responder> {
    let images = services::upload::list_images(pipeline.reports().images().as_ref()).await;
    Success::ok(images)
}

use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use common::error::Res;
use serde::{Deserialize, Serialize};
use storage::{ListOptions, StorageClient};

use crate::ports::{ImageSource, StoredImage};

/// Same cap as uploads; anything bigger did not come from the upload endpoint.
pub const MAX_MARKETING_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image info returned by the upload endpoint and echoed back by clients
/// when they request a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImageInfo {
    pub category: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// Picks the marketing image URL for a member of `target_category`.
///
/// An uploaded image of the matching category wins. Otherwise the most
/// recently updated stored image whose name matches the category is used.
/// Listing failures count as "no image".
pub async fn select_marketing_image(
    target_category: &str,
    uploaded: Option<&UploadedImageInfo>,
    source: &dyn ImageSource,
) -> Option<String> {
    if let Some(info) = uploaded {
        if info.category == target_category {
            if let Some(path) = info.file_path.as_deref().filter(|p| !p.is_empty()) {
                return Some(path.to_string());
            }
        }
    }

    match source.list(Some(target_category)).await {
        Ok(images) => newest_first(images).into_iter().next().map(|image| image.url),
        Err(e) => {
            log::error!("Error finding marketing images: {}", e);
            None
        }
    }
}

/// Sorts by `updated_at` descending; entries without a parseable timestamp go last.
pub fn newest_first(mut images: Vec<StoredImage>) -> Vec<StoredImage> {
    fn parsed(image: &StoredImage) -> Option<DateTime<FixedOffset>> {
        image
            .updated_at
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
    }

    images.sort_by(|a, b| match (parsed(a), parsed(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    images
}

pub struct StorageImageSource {
    client: Arc<StorageClient>,
    bucket: String,
}

impl StorageImageSource {
    pub fn new(client: Arc<StorageClient>, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ImageSource for StorageImageSource {
    async fn list(&self, search: Option<&str>) -> Res<Vec<StoredImage>> {
        let mut options = ListOptions::new().limit(100);
        if let Some(search) = search {
            options = options.search(search);
        }

        let bucket = self.client.from(&self.bucket);
        let files = bucket.list("", options).await?;

        Ok(files
            .into_iter()
            // folder placeholders carry no id
            .filter(|f| f.id.is_some() && !f.name.starts_with('.'))
            .map(|f| StoredImage {
                url: bucket.get_public_url(&f.name),
                name: f.name,
                updated_at: f.updated_at,
            })
            .collect())
    }

    async fn fetch(&self, url: &str) -> Res<Vec<u8>> {
        Ok(self
            .client
            .from(&self.bucket)
            .fetch_public(url, MAX_MARKETING_IMAGE_BYTES)
            .await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use common::error::AppError;

    use super::*;

    /// In-memory listing that records the searches it served.
    #[derive(Default)]
    pub struct FakeImages {
        pub images: Vec<StoredImage>,
        pub fail_listing: bool,
        pub fail_fetch: bool,
        pub bytes: Vec<u8>,
        pub searches: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl ImageSource for FakeImages {
        async fn list(&self, search: Option<&str>) -> Res<Vec<StoredImage>> {
            self.searches.lock().unwrap().push(search.map(str::to_string));
            if self.fail_listing {
                return Err(AppError::Storage("unreachable".to_string()));
            }
            Ok(self
                .images
                .iter()
                .filter(|i| search.is_none_or(|s| i.name.contains(s)))
                .cloned()
                .collect())
        }

        async fn fetch(&self, _url: &str) -> Res<Vec<u8>> {
            if self.fail_fetch {
                return Err(AppError::Storage("object gone".to_string()));
            }
            Ok(self.bytes.clone())
        }
    }

    pub fn stored(name: &str, updated_at: Option<&str>) -> StoredImage {
        StoredImage {
            name: name.to_string(),
            url: format!("https://cdn.example/{}", name),
            updated_at: updated_at.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn uploaded_image_of_matching_category_wins() {
        let source = FakeImages::default();
        let info = UploadedImageInfo {
            category: "new".to_string(),
            file_path: Some("https://cdn.example/new-1-1.png".to_string()),
            ..Default::default()
        };

        let picked = select_marketing_image("new", Some(&info), &source).await;
        assert_eq!(picked.as_deref(), Some("https://cdn.example/new-1-1.png"));
        assert!(source.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn falls_back_to_newest_stored_image() {
        let source = FakeImages {
            images: vec![
                stored("existing-2-100.png", Some("2024-01-01T00:00:00Z")),
                stored("existing-5-300.png", Some("2024-03-01T00:00:00Z")),
                stored("new-9-200.png", Some("2024-05-01T00:00:00Z")),
            ],
            ..Default::default()
        };
        let mismatched = UploadedImageInfo {
            category: "new".to_string(),
            file_path: Some("https://cdn.example/new-9-200.png".to_string()),
            ..Default::default()
        };

        let picked = select_marketing_image("existing", Some(&mismatched), &source).await;
        assert_eq!(picked.as_deref(), Some("https://cdn.example/existing-5-300.png"));
    }

    #[tokio::test]
    async fn listing_failure_means_no_image() {
        let source = FakeImages {
            fail_listing: true,
            ..Default::default()
        };
        assert_eq!(select_marketing_image("new", None, &source).await, None);
    }

    #[test]
    fn undated_images_sort_last() {
        let sorted = newest_first(vec![
            stored("a", None),
            stored("b", Some("2024-01-01T00:00:00Z")),
        ]);
        assert_eq!(sorted[0].name, "b");
        assert_eq!(stored("new-1-2.png", None).category(), "new");
    }
}

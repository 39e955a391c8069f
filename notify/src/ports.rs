use async_trait::async_trait;
use common::error::Res;

/// Persists per-channel delivery status for one BMI record.
#[async_trait]
pub trait NotificationLedger: Send + Sync {
    /// Creates the row with both channels unsent. Returns its id.
    async fn open(&self, member_id: i32, bmi_record_id: i32) -> Res<i32>;
    async fn record_whatsapp(&self, notification_id: i32, sent: bool) -> Res<()>;
    async fn record_email(&self, notification_id: i32, sent: bool) -> Res<()>;
}

#[async_trait]
pub trait WhatsAppSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Res<()>;
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachment: Option<EmailAttachment>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Res<()>;
}

/// An image object as listed by the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub name: String,
    pub url: String,
    pub updated_at: Option<String>,
}

impl StoredImage {
    /// Category prefix of `{category}-{customerId}-{millis}.{ext}` names.
    pub fn category(&self) -> &str {
        self.name.split('-').next().unwrap_or_default()
    }
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn list(&self, search: Option<&str>) -> Res<Vec<StoredImage>>;
    async fn fetch(&self, url: &str) -> Res<Vec<u8>>;
}

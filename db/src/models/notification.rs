use chrono::NaiveDateTime;
use serde::Serialize;

pub const STATUS_SENT: &str = "sent";
pub const STATUS_FAILED: &str = "failed";

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    pub member_id: i32,
    pub bmi_record_id: i32,
    pub whatsapp_sent: bool,
    pub email_sent: bool,
    pub whatsapp_status: Option<String>,
    pub email_status: Option<String>,
    pub sent_at: NaiveDateTime,
}

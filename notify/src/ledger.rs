use std::sync::Arc;

use async_trait::async_trait;
use common::error::Res;
use db::models::notification::{STATUS_FAILED, STATUS_SENT};
use sqlx::PgPool;

use crate::ports::NotificationLedger;

pub struct PgLedger {
    pool: Arc<PgPool>,
}

impl PgLedger {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn status(sent: bool) -> &'static str {
    if sent { STATUS_SENT } else { STATUS_FAILED }
}

#[async_trait]
impl NotificationLedger for PgLedger {
    async fn open(&self, member_id: i32, bmi_record_id: i32) -> Res<i32> {
        let row = db::notification::insert_notification(&*self.pool, member_id, bmi_record_id).await?;
        Ok(row.id)
    }

    async fn record_whatsapp(&self, notification_id: i32, sent: bool) -> Res<()> {
        db::notification::set_whatsapp_status(&*self.pool, notification_id, sent, status(sent)).await
    }

    async fn record_email(&self, notification_id: i32, sent: bool) -> Res<()> {
        db::notification::set_email_status(&*self.pool, notification_id, sent, status(sent)).await
    }
}

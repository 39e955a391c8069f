use async_trait::async_trait;
use common::error::Res;

use crate::ports::WhatsAppSender;

/// Writes the message to the log instead of delivering it.
pub struct LogWhatsApp;

#[async_trait]
impl WhatsAppSender for LogWhatsApp {
    async fn send(&self, phone: &str, message: &str) -> Res<()> {
        log::info!("WhatsApp message to {}:\n{}", phone, message);
        Ok(())
    }
}

use serde::Serialize;

/// What happened on one delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ChannelOutcome {
    Sent,
    Failed(String),
    Skipped(String),
}

impl ChannelOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ChannelOutcome::Sent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    /// `None` when the ledger row could not be created.
    pub notification_id: Option<i32>,
    pub whatsapp: ChannelOutcome,
    pub email: ChannelOutcome,
}

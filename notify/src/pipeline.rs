use std::sync::Arc;

use common::{env_config::GymConfig, misc::report_file_name};
use db::models::bmi::BmiRecordWithMember;

use crate::{
    images::UploadedImageInfo,
    outcome::{ChannelOutcome, NotificationOutcome},
    ports::{EmailAttachment, Mailer, NotificationLedger, OutgoingEmail, WhatsAppSender},
    report::ReportGenerator,
    templates,
};

pub const MAIL_NOT_CONFIGURED: &str = "Email configuration incomplete";

/// Delivers the post-assessment WhatsApp message and emailed report for one
/// BMI record, recording each channel's result in the ledger.
///
/// `data.member` must be the member as it was before the record was saved so
/// first-time members get the welcome templates.
pub struct NotificationPipeline {
    ledger: Arc<dyn NotificationLedger>,
    whatsapp: Arc<dyn WhatsAppSender>,
    mailer: Option<Arc<dyn Mailer>>,
    reports: Arc<ReportGenerator>,
    gym: GymConfig,
}

impl NotificationPipeline {
    pub fn new(
        ledger: Arc<dyn NotificationLedger>,
        whatsapp: Arc<dyn WhatsAppSender>,
        mailer: Option<Arc<dyn Mailer>>,
        reports: Arc<ReportGenerator>,
        gym: GymConfig,
    ) -> Self {
        Self {
            ledger,
            whatsapp,
            mailer,
            reports,
            gym,
        }
    }

    pub fn reports(&self) -> &Arc<ReportGenerator> {
        &self.reports
    }

    pub async fn run(
        &self,
        data: &BmiRecordWithMember,
        uploaded: Option<&UploadedImageInfo>,
    ) -> NotificationOutcome {
        let notification_id = match self.ledger.open(data.member.id, data.record.id).await {
            Ok(id) => id,
            Err(e) => {
                log::error!(
                    "Could not create notification for BMI record {}: {}",
                    data.record.id,
                    e
                );
                let reason = "Notification record could not be created".to_string();
                return NotificationOutcome {
                    notification_id: None,
                    whatsapp: ChannelOutcome::Skipped(reason.clone()),
                    email: ChannelOutcome::Skipped(reason),
                };
            }
        };

        let is_new = data.member.is_new_customer();

        let whatsapp = self.whatsapp_channel(data, is_new).await;
        if !matches!(whatsapp, ChannelOutcome::Skipped(_)) {
            if let Err(e) = self
                .ledger
                .record_whatsapp(notification_id, whatsapp.is_sent())
                .await
            {
                log::error!("Could not update WhatsApp status of notification {}: {}", notification_id, e);
            }
        }

        let email = self.email_channel(data, uploaded, is_new).await;
        if !matches!(email, ChannelOutcome::Skipped(_)) {
            if let Err(e) = self.ledger.record_email(notification_id, email.is_sent()).await {
                log::error!("Could not update email status of notification {}: {}", notification_id, e);
            }
        }

        NotificationOutcome {
            notification_id: Some(notification_id),
            whatsapp,
            email,
        }
    }

    async fn whatsapp_channel(&self, data: &BmiRecordWithMember, is_new: bool) -> ChannelOutcome {
        let phone = data.member.phone.trim();
        if phone.is_empty() {
            return ChannelOutcome::Skipped("No phone number".to_string());
        }

        let message = templates::whatsapp_message(data, &self.gym, is_new);
        match self.whatsapp.send(phone, &message).await {
            Ok(()) => ChannelOutcome::Sent,
            Err(e) => {
                log::error!("WhatsApp delivery to {} failed: {}", data.member.member_id, e);
                ChannelOutcome::Failed(e.to_string())
            }
        }
    }

    async fn email_channel(
        &self,
        data: &BmiRecordWithMember,
        uploaded: Option<&UploadedImageInfo>,
        is_new: bool,
    ) -> ChannelOutcome {
        let Some(to) = data
            .member
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
        else {
            return ChannelOutcome::Skipped("No email address".to_string());
        };

        let Some(mailer) = &self.mailer else {
            log::warn!("Skipping report email for {}: {}", data.member.member_id, MAIL_NOT_CONFIGURED);
            return ChannelOutcome::Failed(MAIL_NOT_CONFIGURED.to_string());
        };

        let pdf = match self.reports.generate(data, uploaded).await {
            Ok(pdf) => pdf,
            Err(e) => {
                log::error!("Report generation for {} failed: {}", data.member.member_id, e);
                return ChannelOutcome::Failed(e.to_string());
            }
        };

        let email = OutgoingEmail {
            to: to.to_string(),
            subject: templates::email_subject(&self.gym, is_new),
            html: templates::email_html(data, &self.gym, is_new),
            attachment: Some(EmailAttachment {
                file_name: report_file_name(&data.member.name),
                content_type: "application/pdf".to_string(),
                bytes: pdf,
            }),
        };

        match mailer.send(email).await {
            Ok(()) => ChannelOutcome::Sent,
            Err(e) => {
                log::error!("Report email to {} failed: {}", data.member.member_id, e);
                ChannelOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use common::error::{AppError, Res};

    use super::*;
    use crate::{
        images::tests::FakeImages,
        templates::tests::{gym, record},
    };

    #[derive(Default)]
    struct FakeLedger {
        fail_open: bool,
        whatsapp: Mutex<Vec<(i32, bool)>>,
        email: Mutex<Vec<(i32, bool)>>,
    }

    #[async_trait]
    impl NotificationLedger for FakeLedger {
        async fn open(&self, _member_id: i32, _bmi_record_id: i32) -> Res<i32> {
            if self.fail_open {
                return Err(AppError::Internal("boom".to_string()));
            }
            Ok(7)
        }

        async fn record_whatsapp(&self, notification_id: i32, sent: bool) -> Res<()> {
            self.whatsapp.lock().unwrap().push((notification_id, sent));
            Ok(())
        }

        async fn record_email(&self, notification_id: i32, sent: bool) -> Res<()> {
            self.email.lock().unwrap().push((notification_id, sent));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeWhatsApp {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl WhatsAppSender for FakeWhatsApp {
        async fn send(&self, phone: &str, message: &str) -> Res<()> {
            if self.fail {
                return Err(AppError::Internal("boom".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((phone.to_string(), message.to_string()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        fail: bool,
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send(&self, email: OutgoingEmail) -> Res<()> {
            if self.fail {
                return Err(AppError::Mail("connection refused".to_string()));
            }
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }

    fn pipeline(
        ledger: Arc<FakeLedger>,
        whatsapp: Arc<FakeWhatsApp>,
        mailer: Option<Arc<FakeMailer>>,
    ) -> NotificationPipeline {
        let reports = Arc::new(ReportGenerator::new(Arc::new(FakeImages::default()), gym(), None));
        NotificationPipeline::new(
            ledger,
            whatsapp,
            mailer.map(|m| m as Arc<dyn Mailer>),
            reports,
            gym(),
        )
    }

    #[tokio::test]
    async fn both_channels_delivered_and_recorded() {
        let ledger = Arc::new(FakeLedger::default());
        let whatsapp = Arc::new(FakeWhatsApp::default());
        let mailer = Arc::new(FakeMailer::default());
        let p = pipeline(ledger.clone(), whatsapp.clone(), Some(mailer.clone()));

        let outcome = p
            .run(&record("new", "9998887777", Some("jane@example.com")), None)
            .await;

        assert_eq!(
            outcome,
            NotificationOutcome {
                notification_id: Some(7),
                whatsapp: ChannelOutcome::Sent,
                email: ChannelOutcome::Sent,
            }
        );
        assert_eq!(*ledger.whatsapp.lock().unwrap(), vec![(7, true)]);
        assert_eq!(*ledger.email.lock().unwrap(), vec![(7, true)]);

        let messages = whatsapp.sent.lock().unwrap();
        assert_eq!(messages[0].0, "9998887777");
        assert!(messages[0].1.starts_with("🎉 *Welcome to Iron Temple!*"));

        let emails = mailer.sent.lock().unwrap();
        assert_eq!(emails[0].to, "jane@example.com");
        assert_eq!(
            emails[0].subject,
            "🎉 Your Fitness Report Is Ready - Welcome to Iron Temple!"
        );
        let attachment = emails[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.file_name, "Jane-<Doe>-Health-Report.pdf");
        assert!(attachment.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn whatsapp_failure_does_not_block_email() {
        let ledger = Arc::new(FakeLedger::default());
        let whatsapp = Arc::new(FakeWhatsApp {
            fail: true,
            ..Default::default()
        });
        let mailer = Arc::new(FakeMailer::default());
        let p = pipeline(ledger.clone(), whatsapp, Some(mailer.clone()));

        let outcome = p
            .run(&record("existing", "9998887777", Some("jane@example.com")), None)
            .await;

        assert!(matches!(outcome.whatsapp, ChannelOutcome::Failed(_)));
        assert_eq!(outcome.email, ChannelOutcome::Sent);
        assert_eq!(*ledger.whatsapp.lock().unwrap(), vec![(7, false)]);
        assert_eq!(*ledger.email.lock().unwrap(), vec![(7, true)]);
        assert_eq!(
            mailer.sent.lock().unwrap()[0].subject,
            "🎉 Your Updated Fitness Report Is Ready"
        );
    }

    #[tokio::test]
    async fn missing_mail_configuration_fails_email_channel() {
        let ledger = Arc::new(FakeLedger::default());
        let p = pipeline(ledger.clone(), Arc::new(FakeWhatsApp::default()), None);

        let outcome = p
            .run(&record("new", "9998887777", Some("jane@example.com")), None)
            .await;

        assert_eq!(outcome.email, ChannelOutcome::Failed(MAIL_NOT_CONFIGURED.to_string()));
        assert_eq!(*ledger.email.lock().unwrap(), vec![(7, false)]);
    }

    #[tokio::test]
    async fn mail_transport_error_is_recorded_as_failed() {
        let ledger = Arc::new(FakeLedger::default());
        let mailer = Arc::new(FakeMailer {
            fail: true,
            ..Default::default()
        });
        let p = pipeline(ledger.clone(), Arc::new(FakeWhatsApp::default()), Some(mailer));

        let outcome = p
            .run(&record("new", "9998887777", Some("jane@example.com")), None)
            .await;

        assert_eq!(
            outcome.email,
            ChannelOutcome::Failed("Mail error: connection refused".to_string())
        );
        assert_eq!(*ledger.email.lock().unwrap(), vec![(7, false)]);
    }

    #[tokio::test]
    async fn absent_contacts_are_skipped_and_left_unset() {
        let ledger = Arc::new(FakeLedger::default());
        let whatsapp = Arc::new(FakeWhatsApp::default());
        let mailer = Arc::new(FakeMailer::default());
        let p = pipeline(ledger.clone(), whatsapp.clone(), Some(mailer.clone()));

        let outcome = p.run(&record("new", "  ", Some("")), None).await;

        assert!(matches!(outcome.whatsapp, ChannelOutcome::Skipped(_)));
        assert!(matches!(outcome.email, ChannelOutcome::Skipped(_)));
        assert!(ledger.whatsapp.lock().unwrap().is_empty());
        assert!(ledger.email.lock().unwrap().is_empty());
        assert!(whatsapp.sent.lock().unwrap().is_empty());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_failure_skips_delivery() {
        let ledger = Arc::new(FakeLedger {
            fail_open: true,
            ..Default::default()
        });
        let whatsapp = Arc::new(FakeWhatsApp::default());
        let p = pipeline(ledger, whatsapp.clone(), Some(Arc::new(FakeMailer::default())));

        let outcome = p
            .run(&record("new", "9998887777", Some("jane@example.com")), None)
            .await;

        assert_eq!(outcome.notification_id, None);
        assert!(matches!(outcome.whatsapp, ChannelOutcome::Skipped(_)));
        assert!(whatsapp.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn outcome_serializes_with_status_tags() {
        let outcome = NotificationOutcome {
            notification_id: Some(3),
            whatsapp: ChannelOutcome::Sent,
            email: ChannelOutcome::Failed("smtp down".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({
                "notificationId": 3,
                "whatsapp": { "status": "sent" },
                "email": { "status": "failed", "reason": "smtp down" }
            })
        );
    }
}

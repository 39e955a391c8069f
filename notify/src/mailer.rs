use std::time::Duration;

use async_trait::async_trait;
use common::{
    env_config::MailConfig,
    error::{AppError, Res},
};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::ports::{Mailer, OutgoingEmail};

/// STARTTLS SMTP delivery.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig, timeout: Duration) -> Res<Self> {
        let (Some(host), Some(user), Some(pass), Some(from)) =
            (&config.host, &config.user, &config.pass, &config.from)
        else {
            return Err(AppError::Mail(format!(
                "Email configuration incomplete, missing {}",
                config.missing().join(", ")
            )));
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Mail(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(user.clone(), pass.clone()))
            .timeout(Some(timeout))
            .build();

        let from = from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Mail(format!("Invalid sender address: {}", e)))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Res<()> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Mail(format!("Invalid recipient address: {}", e)))?;

        let mut body = MultiPart::mixed().singlepart(SinglePart::html(email.html));
        if let Some(attachment) = email.attachment {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| AppError::Mail(e.to_string()))?;
            body = body.singlepart(Attachment::new(attachment.file_name).body(attachment.bytes, content_type));
        }

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(body)
            .map_err(|e| AppError::Mail(e.to_string()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;
        log::debug!("SMTP accepted message: {:?}", response.code());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_incomplete_configuration() {
        let config = MailConfig {
            host: Some("smtp.example.com".to_string()),
            port: 587,
            ..Default::default()
        };
        let error = SmtpMailer::new(&config, Duration::from_secs(5)).err().unwrap();
        assert_eq!(
            error.to_string(),
            "Mail error: Email configuration incomplete, missing SMTP_USER, SMTP_PASS, GYM_EMAIL"
        );
    }
}

use crate::config::{SmtpSettings, SmtpTls};
use crate::domain::error::DomainError;
use crate::domain::ports::report_delivery::ReportDelivery;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

/// Sends the report as one HTML email addressed to every recipient.
pub struct SmtpDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpDelivery {
    pub fn new(smtp: &SmtpSettings, recipients: &[String]) -> Result<Self, DomainError> {
        let from: Mailbox = smtp
            .user
            .parse()
            .map_err(|e| DomainError::Config(format!("Invalid SMTP_USER address: {e}")))?;

        let to = parse_recipients(recipients)?;

        let builder = match smtp.tls {
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host),
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host),
        }
        .map_err(|e| DomainError::Config(format!("SMTP transport error: {e}")))?;

        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(smtp.user.clone(), smtp.password.clone()))
            .build();

        Ok(Self { transport, from, to })
    }
}

fn parse_recipients(recipients: &[String]) -> Result<Vec<Mailbox>, DomainError> {
    let to = recipients
        .iter()
        .map(|addr| {
            addr.parse::<Mailbox>()
                .map_err(|e| DomainError::Config(format!("Invalid recipient {addr}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if to.is_empty() {
        return Err(DomainError::Config("No recipients configured".into()));
    }
    Ok(to)
}

#[async_trait]
impl ReportDelivery for SmtpDelivery {
    async fn deliver(&self, subject: &str, html: &str) -> Result<(), DomainError> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }
        let email = builder
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| DomainError::Delivery(format!("Failed to build email: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| DomainError::Delivery(format!("Failed to send email: {e}")))?;
        info!(recipients = self.to.len(), "Email report sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

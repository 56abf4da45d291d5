//! Email delivery over SMTP with STARTTLS.

use crate::config::SmtpConfig;
use crate::error::EmailError;
use crate::outputs::EmailBody;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info, instrument};

/// Email sender for the daily digest.
#[derive(Debug)]
pub struct EmailSender<'a> {
    config: &'a SmtpConfig,
    from: Mailbox,
    to: Mailbox,
}

impl<'a> EmailSender<'a> {
    /// Validate the sender and recipient addresses.
    pub fn new(config: &'a SmtpConfig) -> Result<Self, EmailError> {
        let from = parse_mailbox("from", &config.from_email)?;
        let to = parse_mailbox("to", &config.to_email)?;
        Ok(Self { config, from, to })
    }

    /// Build the `multipart/alternative` message: plain part first, HTML last.
    pub fn build_message(&self, body: &EmailBody) -> Result<Message, EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(body.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.plain.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(body.html.clone()),
                    ),
            )?;
        Ok(message)
    }

    /// Connect, upgrade to TLS, authenticate and send.
    ///
    /// Every SMTP or transport error is returned to the caller.
    #[instrument(level = "info", skip_all, fields(host = %self.config.host, port = self.config.port, to = %self.config.to_email))]
    pub async fn send(&self, body: &EmailBody) -> Result<(), EmailError> {
        let message = self.build_message(body)?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .port(self.config.port)
                .credentials(creds)
                .timeout(Some(self.config.timeout))
                .build();

        info!(username = %self.config.username, "Sending digest email");
        match mailer.send(message).await {
            Ok(response) => {
                info!(code = %response.code(), subject = %body.subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "SMTP error while sending email");
                Err(e.into())
            }
        }
    }
}

fn parse_mailbox(field: &'static str, value: &str) -> Result<Mailbox, EmailError> {
    value.parse().map_err(|source| EmailError::Address {
        field,
        value: value.to_string(),
        source,
    })
}

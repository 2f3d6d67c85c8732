//! Best-effort outbound mail relay.
//!
//! Triggered when a suggestion is accepted and by the admin test-mail
//! operation. Transport failures are folded into the returned outcome and
//! never propagate to the caller; an unconfigured relay short-circuits
//! without attempting a connection.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;

use crate::config::SmtpConfig;

/// Result of a relay attempt. Never an error from the caller's point of view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelayOutcome {
    Sent,
    NotConfigured,
    Failed { reason: String },
}

struct MailerInner {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// SMTP mailer built from optional deploy-time credentials.
pub struct Mailer {
    inner: Option<MailerInner>,
}

impl Mailer {
    /// Build the mailer. Missing or unusable credentials leave it
    /// unconfigured rather than failing startup.
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Self {
        let Some(smtp) = smtp else {
            return Self { inner: None };
        };

        match MailerInner::build(smtp) {
            Ok(inner) => Self { inner: Some(inner) },
            Err(reason) => {
                tracing::warn!("Mail relay misconfigured, disabling: {}", reason);
                Self { inner: None }
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// Deliver a message to the configured recipient.
    pub async fn notify(&self, subject: &str, body: &str) -> RelayOutcome {
        let Some(inner) = &self.inner else {
            return RelayOutcome::NotConfigured;
        };

        let message = Message::builder()
            .from(inner.from.clone())
            .to(inner.to.clone())
            .subject(subject)
            .body(body.to_string());

        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Failed to build notification message: {}", e);
                return RelayOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match inner.transport.send(message).await {
            Ok(_) => RelayOutcome::Sent,
            Err(e) => {
                tracing::warn!("Notification delivery failed: {}", e);
                RelayOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl MailerInner {
    fn build(smtp: &SmtpConfig) -> Result<Self, String> {
        let from: Mailbox = smtp
            .user
            .parse()
            .map_err(|e| format!("invalid sender address {:?}: {}", smtp.user, e))?;
        let to: Mailbox = smtp
            .to
            .parse()
            .map_err(|e| format!("invalid recipient address {:?}: {}", smtp.to, e))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| format!("invalid SMTP host {:?}: {}", smtp.host, e))?
            .port(smtp.port)
            .credentials(Credentials::new(smtp.user.clone(), smtp.pass.clone()))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_mailer() {
        let mailer = Mailer::from_config(None);
        assert!(!mailer.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_notify_short_circuits() {
        let mailer = Mailer::from_config(None);
        assert!(matches!(
            mailer.notify("Test", "Body").await,
            RelayOutcome::NotConfigured
        ));
    }

    #[test]
    fn test_bad_addresses_disable_relay() {
        let smtp = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "not an address".to_string(),
            pass: "secret".to_string(),
            to: "ops@example.com".to_string(),
        };

        assert!(!Mailer::from_config(Some(&smtp)).is_configured());
    }
}

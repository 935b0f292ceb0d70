//! Report delivery over SMTP.

use anyhow::{anyhow, Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::info;

use a11yscan_core::Config;

/// Sends finished scan reports by email. `from_config` returns `None` when
/// SMTP is not configured; the pipeline surfaces that at processing time.
#[derive(Clone)]
pub struct ReportMailer {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl ReportMailer {
    /// Create the mailer from config. Returns `None` unless SMTP_HOST and
    /// SMTP_FROM are both set.
    pub fn from_config(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let from = config.smtp_from.clone()?;
        let port = config.smtp_port.unwrap_or(587);

        let builder = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let builder = builder.port(port);
        let builder = if let (Some(user), Some(password)) =
            (config.smtp_user.as_ref(), config.smtp_password.as_ref())
        {
            builder.credentials(Credentials::new(user.clone(), password.clone()))
        } else {
            builder
        };

        info!(
            host = %host,
            port = port,
            tls = config.smtp_tls,
            "Report mailer initialized"
        );

        Some(Self {
            mailer: Arc::new(builder.build()),
            from,
        })
    }

    /// Send a plain-text report email.
    pub async fn send_report(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let to_addr: Mailbox = to
            .parse()
            .map_err(|e| anyhow!("Invalid recipient address '{to}': {e}"))?;
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|e| anyhow!("Invalid SMTP_FROM: {e}"))?;

        let email = Message::builder()
            .from(from_addr)
            .to(to_addr)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build report email")?;

        self.mailer
            .send(email)
            .await
            .context("SMTP send failed")?;

        info!(recipient = %to, "Scan report email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_host_and_from() {
        let config = Config::default();
        assert!(ReportMailer::from_config(&config).is_none());

        let config = Config {
            smtp_host: Some("smtp.example.com".into()),
            ..Config::default()
        };
        assert!(
            ReportMailer::from_config(&config).is_none(),
            "SMTP_FROM is required too"
        );

        let config = Config {
            smtp_host: Some("smtp.example.com".into()),
            smtp_from: Some("reports@example.com".into()),
            ..Config::default()
        };
        assert!(ReportMailer::from_config(&config).is_some());
    }
}

use std::{fmt, sync::Arc};

use axum::http::StatusCode;
use lazy_static::lazy_static;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use standard_error::{Interpolate, StandardError, Status};

pub mod direct;
pub mod status;

use crate::{
    conf::{settings, SmtpSettings},
    prelude::Result,
};

/// Fully rendered plaintext message, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: OutgoingEmail) -> Result<()>;
}

pub struct SmtpMailer {
    from: Mailbox,
    transport: SmtpTransport,
}

fn mail_err(e: impl fmt::Display) -> StandardError {
    StandardError::new("ERR-MAIL-002")
        .code(StatusCode::INTERNAL_SERVER_ERROR)
        .interpolate_err(e.to_string())
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpSettings) -> Result<Self> {
        let builder = if smtp.secure {
            SmtpTransport::relay(&smtp.host)
        } else {
            SmtpTransport::starttls_relay(&smtp.host)
        }
        .map_err(mail_err)?;
        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(smtp.user.clone(), smtp.pass.clone()))
            .build();
        let from = format!("{} <{}>", &settings.service_name, &smtp.from)
            .parse::<Mailbox>()
            .map_err(mail_err)?;
        Ok(SmtpMailer { from, transport })
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
        let address = email.to.parse::<Address>().map_err(mail_err)?;
        let name = Some(email.to_name).filter(|n| !n.is_empty());
        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(name, address))
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(mail_err)?;
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(mail_err)?
            .map_err(mail_err)?;
        Ok(())
    }
}

lazy_static! {
    static ref SMTP: Option<Arc<SmtpMailer>> = settings.smtp().and_then(|smtp| {
        match SmtpMailer::new(&smtp) {
            Ok(mailer) => {
                tracing::info!("smtp transport ready via {}:{}", smtp.host, smtp.port);
                Some(Arc::new(mailer))
            }
            Err(e) => {
                tracing::error!("smtp transport misconfigured, mail disabled: {}", e);
                None
            }
        }
    });
}

/// Sends templated mail when a transport is configured and silently skips otherwise.
#[derive(Clone)]
pub struct Notifier {
    transport: Option<Arc<dyn MailTransport>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl Notifier {
    /// Uses the process-wide SMTP transport, built on first use.
    pub fn from_settings() -> Self {
        Notifier {
            transport: SMTP
                .as_ref()
                .map(|mailer| mailer.clone() as Arc<dyn MailTransport>),
        }
    }

    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Notifier {
            transport: Some(transport),
        }
    }

    pub fn disabled() -> Self {
        Notifier { transport: None }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// `Ok(false)` means nothing was sent: no transport or no recipient.
    pub async fn dispatch(
        &self,
        to: Option<&str>,
        to_name: &str,
        subject: String,
        body: String,
    ) -> Result<bool> {
        let Some(transport) = &self.transport else {
            tracing::debug!("mail transport not configured, skipping \"{}\"", subject);
            return Ok(false);
        };
        let Some(to) = to.map(str::trim).filter(|t| !t.is_empty()) else {
            tracing::debug!("no recipient on file, skipping \"{}\"", subject);
            return Ok(false);
        };
        transport
            .deliver(OutgoingEmail {
                to: to.to_string(),
                to_name: to_name.to_string(),
                subject,
                body,
            })
            .await?;
        tracing::info!("email sent to {}", to);
        Ok(true)
    }
}

#[async_trait::async_trait]
pub trait SendEmail: fmt::Display + Sync {
    fn subject(&self) -> String;

    fn recipient(&self) -> &str;

    async fn send(&self, notifier: &Notifier, email: Option<&str>) -> Result<bool> {
        notifier
            .dispatch(email, self.recipient(), self.subject(), self.to_string())
            .await
    }
}

/// Greeting name used when the applicant left theirs blank.
pub(crate) fn display_name(name: &str) -> &str {
    let name = name.trim();
    if name.is_empty() {
        "Applicant"
    } else {
        name
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::Mutex;

    use tracing_test::traced_test;

    use super::*;

    /// Captures messages instead of sending them.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<OutgoingEmail>>,
    }

    impl RecordingTransport {
        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }

    /// Always fails, for exercising the swallow paths.
    pub struct BrokenTransport;

    #[async_trait::async_trait]
    impl MailTransport for BrokenTransport {
        async fn deliver(&self, _email: OutgoingEmail) -> Result<()> {
            Err(mail_err("connection refused"))
        }
    }

    #[traced_test]
    #[tokio::test]
    async fn test_disabled_notifier_is_a_noop() -> Result<()> {
        let sent = Notifier::disabled()
            .dispatch(Some("ann@x.com"), "Ann", "hi".into(), "body".into())
            .await?;
        assert!(!sent);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_recipient_is_a_noop() -> Result<()> {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::new(transport.clone());
        assert!(!notifier.dispatch(None, "Ann", "s".into(), "b".into()).await?);
        assert!(!notifier.dispatch(Some("  "), "Ann", "s".into(), "b".into()).await?);
        assert!(transport.sent().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_dispatch_hands_message_to_transport() -> Result<()> {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::new(transport.clone());
        assert!(notifier.is_configured());
        assert!(
            notifier
                .dispatch(Some("ann@x.com"), "Ann", "subject".into(), "body".into())
                .await?
        );
        assert_eq!(
            transport.sent(),
            vec![OutgoingEmail {
                to: "ann@x.com".into(),
                to_name: "Ann".into(),
                subject: "subject".into(),
                body: "body".into(),
            }]
        );
        Ok(())
    }

    #[test]
    fn test_display_name_defaults() {
        assert_eq!(display_name("  "), "Applicant");
        assert_eq!(display_name(" Ann "), "Ann");
    }
}

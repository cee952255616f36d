use crate::config::MailConfig;
use crate::domain::email::{Mailbox, OutboundEmail};
use crate::services::mail::{MailTransport, TransportError};
use async_trait::async_trait;
use lettre::message::{Mailbox as WireMailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error as StdError;
use std::io;

/// SMTP delivery through lettre. A fresh, unpooled transport is built for every call,
/// so concurrent submissions never share a connection.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    #[must_use]
    pub const fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let tls = TlsParameters::builder(self.config.smtp_host.clone())
            .dangerous_accept_invalid_certs(self.config.smtp_accept_invalid_certs)
            .build()
            .map_err(|e| TransportError::Other(format!("TLS setup failed: {e}")))?;

        let tls = if self.config.secure() { Tls::Wrapper(tls) } else { Tls::Required(tls) };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(self.config.smtp_host.as_str())
            .port(self.config.smtp_port)
            .tls(tls)
            .timeout(Some(self.config.phase_timeout()));

        if let (Some(user), Some(pass)) = (&self.config.email_user, &self.config.email_pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), TransportError> {
        let transport = self.transport()?;
        match transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::Other("server rejected NOOP".into())),
            Err(e) => {
                tracing::error!(error = %e, host = %self.config.smtp_host, "SMTP verify failed");
                Err(classify(&e))
            }
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        let message = build_message(email)?;
        let transport = self.transport()?;

        match transport.send(message).await {
            Ok(response) => {
                tracing::info!(
                    code = %response.code(),
                    response = %response.message().collect::<Vec<_>>().join(" "),
                    "SMTP server accepted message"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = ?e, host = %self.config.smtp_host, "SMTP send failed");
                Err(classify(&e))
            }
        }
    }
}

fn wire_mailbox(mailbox: &Mailbox) -> Result<WireMailbox, TransportError> {
    let address: Address = mailbox
        .address
        .parse()
        .map_err(|e| TransportError::Other(format!("invalid address {:?}: {e}", mailbox.address)))?;
    Ok(WireMailbox::new(mailbox.name.clone(), address))
}

fn build_message(email: &OutboundEmail) -> Result<Message, TransportError> {
    let mut builder = Message::builder()
        .from(wire_mailbox(&email.from)?)
        .to(wire_mailbox(&email.to)?)
        .subject(email.subject.clone());

    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(wire_mailbox(reply_to)?);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(email.text.clone(), email.html.clone()))
        .map_err(|e| TransportError::Other(format!("cannot build message: {e}")))
}

fn classify(err: &lettre::transport::smtp::Error) -> TransportError {
    classify_chain(err, err.is_timeout())
}

/// Walks the error's cause chain looking for the I/O failure underneath.
fn classify_chain(err: &(dyn StdError + 'static), timed_out: bool) -> TransportError {
    if timed_out {
        return TransportError::TimedOut;
    }

    let mut cause: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = cause {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::TimedOut => return TransportError::TimedOut,
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::AddrNotAvailable
                | io::ErrorKind::HostUnreachable
                | io::ErrorKind::NetworkUnreachable => {
                    return TransportError::ConnectionRefused(err.to_string());
                }
                _ => {}
            }
        }
        cause = current.source();
    }

    TransportError::Other(err.to_string())
}

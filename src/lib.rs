#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::adapters::smtp::SmtpMailer;
use crate::config::Config;
use crate::domain::email::ComposePolicy;
use crate::services::contact_service::ContactService;
use crate::services::mail::MailTransport;
use std::sync::Arc;
use tokio::sync::watch;

/// Wires configuration and a mail transport into the HTTP router.
#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    transport: Option<Arc<dyn MailTransport>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, transport: None }
    }

    /// Overrides the SMTP transport built from configuration.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn build(self) -> axum::Router {
        let mail = &self.config.mail;
        if !mail.has_credentials() {
            tracing::warn!("Email credentials not set. Set EMAIL_USER and EMAIL_PASS as env vars.");
        }

        let transport =
            self.transport.unwrap_or_else(|| Arc::new(SmtpMailer::new(mail.clone())) as Arc<dyn MailTransport>);

        let policy = ComposePolicy {
            sender_mode: mail.sender_mode,
            account: mail.email_user.clone(),
            recipient: mail.recipient().map(str::to_string),
            escape_html: mail.escape_html,
        };

        let contact_service = ContactService::new(transport, policy, mail.smtp_verify, mail.send_ceiling());
        api::app_router(&self.config, contact_service)
    }
}

/// Logs panics through tracing so they land in the structured log stream.
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(location = %location, payload = %payload, "panic");
        default_hook(info);
    }));
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl+C"),
            () = terminate => tracing::info!("Received SIGTERM"),
        }

        let _ = shutdown_tx.send(true);
    });
}

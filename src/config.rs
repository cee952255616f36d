use clap::{Args, Parser, ValueEnum};
use std::fmt;
use std::time::Duration;

/// Slack between the mail deadline and the outer request timeout, so the mail path
/// always answers first.
pub const REQUEST_TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://panditconstruction.netlify.app,http://localhost:5173,http://localhost:3000";

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub mail: MailConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Comma-separated list of origins allowed to call the API from a browser
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = DEFAULT_ALLOWED_ORIGINS, value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Hard ceiling for a single HTTP request
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 45)]
    pub request_timeout_secs: u64,

    /// How long to wait for in-flight requests on shutdown
    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Allow-list with surrounding whitespace trimmed and empty entries dropped.
    #[must_use]
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()).map(str::to_string).collect()
    }
}

/// Who the outbound email claims to be from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SenderMode {
    /// From: "<visitor name>" <visitor address>
    Visitor,
    /// From: "<visitor name>" <configured account>, Reply-To: visitor address
    #[default]
    Relay,
}

#[derive(Clone, Args)]
pub struct MailConfig {
    /// SMTP account name, also used as the fixed sender address
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    /// SMTP account password
    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    /// Where contact mails are delivered (defaults to the SMTP account)
    #[arg(long, env = "EMAIL_TO")]
    pub email_to: Option<String>,

    /// SMTP server hostname
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// SMTP port; 465 uses implicit TLS, anything else requires STARTTLS
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// Timeout applied to each SMTP phase (connect, greeting, socket)
    #[arg(long, env = "SMTP_TIMEOUT_SECS", default_value_t = 20)]
    pub smtp_timeout_secs: u64,

    /// Skip TLS certificate validation for the SMTP server
    #[arg(long, env = "SMTP_ACCEPT_INVALID_CERTS", default_value_t = true, action = clap::ArgAction::Set)]
    pub smtp_accept_invalid_certs: bool,

    /// Check the SMTP connection before every send
    #[arg(long, env = "SMTP_VERIFY", default_value_t = true, action = clap::ArgAction::Set)]
    pub smtp_verify: bool,

    /// Sender address strategy
    #[arg(long, env = "SENDER_MODE", value_enum, default_value_t = SenderMode::Relay)]
    pub sender_mode: SenderMode,

    /// Escape visitor input before embedding it in the HTML body
    #[arg(long, env = "ESCAPE_HTML", default_value_t = false, action = clap::ArgAction::Set)]
    pub escape_html: bool,
}

impl MailConfig {
    /// Implicit TLS is only used on the SMTPS port.
    #[must_use]
    pub const fn secure(&self) -> bool {
        self.smtp_port == 465
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&str> {
        self.email_to.as_deref().or(self.email_user.as_deref())
    }

    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.email_user.is_some() && self.email_pass.is_some()
    }

    #[must_use]
    pub const fn phase_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs)
    }

    /// Deadline for the whole verify-then-send relay of one submission.
    #[must_use]
    pub fn send_ceiling(&self) -> Duration {
        self.phase_timeout() * 3 / 2
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("email_user", &self.email_user)
            .field("email_pass", &self.email_pass.as_ref().map(|_| "[redacted]"))
            .field("email_to", &self.email_to)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_timeout_secs", &self.smtp_timeout_secs)
            .field("smtp_accept_invalid_certs", &self.smtp_accept_invalid_certs)
            .field("smtp_verify", &self.smtp_verify)
            .field("sender_mode", &self.sender_mode)
            .field("escape_html", &self.escape_html)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; telemetry export is disabled when unset
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }

    /// Outer per-request timeout. Raised above the configured value when needed so it
    /// never fires before the mail deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs).max(self.mail.send_ceiling() + REQUEST_TIMEOUT_HEADROOM)
    }
}

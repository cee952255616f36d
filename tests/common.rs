#![allow(dead_code)]
use async_trait::async_trait;
use contact_relay::AppBuilder;
use contact_relay::config::{Config, LogFormat, MailConfig, SenderMode, ServerConfig, TelemetryConfig};
use contact_relay::domain::email::OutboundEmail;
use contact_relay::services::mail::{MailTransport, TransportError};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("contact_relay=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // 0 means let OS choose
            allowed_origins: vec![
                "https://panditconstruction.netlify.app".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            request_timeout_secs: 45,
            shutdown_timeout_secs: 1,
        },
        mail: MailConfig {
            email_user: Some("owner@example.com".to_string()),
            email_pass: Some("app-password".to_string()),
            email_to: None,
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_timeout_secs: 20,
            smtp_accept_invalid_certs: true,
            smtp_verify: true,
            sender_mode: SenderMode::Relay,
            escape_html: false,
        },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

/// What the fake mail server does on each call.
#[derive(Debug, Clone, Default)]
pub enum Behavior {
    #[default]
    Accept,
    FailVerify,
    Refuse,
    TimeOut,
    Reject(String),
    Stall(Duration),
    /// Verify succeeds after `verify`, then the send hangs for `send`.
    SlowVerifyThenStall { verify: Duration, send: Duration },
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub behavior: Mutex<Behavior>,
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub verified: Mutex<usize>,
}

impl ScriptedTransport {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self { behavior: Mutex::new(behavior), ..Self::default() })
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    fn behavior(&self) -> Behavior {
        self.behavior.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for ScriptedTransport {
    async fn verify(&self) -> Result<(), TransportError> {
        *self.verified.lock().unwrap() += 1;
        match self.behavior() {
            Behavior::FailVerify => Err(TransportError::Other("535 authentication failed".into())),
            Behavior::SlowVerifyThenStall { verify, .. } => {
                tokio::time::sleep(verify).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        match self.behavior() {
            Behavior::Accept | Behavior::FailVerify => {
                self.sent.lock().unwrap().push(email.clone());
                Ok(())
            }
            Behavior::Refuse => Err(TransportError::ConnectionRefused("connect ECONNREFUSED".into())),
            Behavior::TimeOut => Err(TransportError::TimedOut),
            Behavior::Reject(reason) => Err(TransportError::Other(reason)),
            Behavior::Stall(d) | Behavior::SlowVerifyThenStall { send: d, .. } => {
                tokio::time::sleep(d).await;
                self.sent.lock().unwrap().push(email.clone());
                Ok(())
            }
        }
    }
}

pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
    pub transport: Arc<ScriptedTransport>,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(get_test_config(), Behavior::Accept).await
    }

    pub async fn spawn_with(config: Config, behavior: Behavior) -> Self {
        setup_tracing();

        let transport = ScriptedTransport::new(behavior);
        let app = AppBuilder::new(config.clone()).with_transport(transport.clone()).build();

        let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { server_url: format!("http://{addr}"), client: reqwest::Client::new(), transport, config }
    }

    pub async fn post_contact(&self, body: serde_json::Value) -> reqwest::Response {
        self.client.post(format!("{}/contact", self.server_url)).json(&body).send().await.unwrap()
    }
}

pub fn jane() -> serde_json::Value {
    serde_json::json!({ "name": "Jane", "email": "jane@example.com", "message": "Hello" })
}

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info, instrument};

use crate::config::{ConfigError, EmailConfig};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Outbound mail used by the auth flow. Tests substitute an in-memory recorder.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp_email(&self, to: &str, user_name: &str, otp: &str, expires_in_minutes: u64) -> Result<(), EmailError>;
}

pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        config.validate()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .timeout(Some(std::time::Duration::from_secs(config.connection_timeout_secs)));

        builder = if config.use_tls {
            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;
            if config.use_starttls {
                builder.tls(Tls::Required(tls_parameters))
            } else {
                builder.tls(Tls::Wrapper(tls_parameters))
            }
        } else {
            builder.tls(Tls::None)
        };

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        info!("SMTP transport configured");
        Ok(Self { config, transport: builder.build() })
    }

    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        let email = build_message(&self.config.from_header(), message)?;
        self.transport.send(email).await.map_err(|e| {
            error!("Failed to send email: {}", e);
            EmailError::SmtpError(e.to_string())
        })?;
        info!("Email sent");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpEmailService {
    async fn send_otp_email(&self, to: &str, user_name: &str, otp: &str, expires_in_minutes: u64) -> Result<(), EmailError> {
        let message = EmailMessage {
            to: to.to_string(),
            subject: "Your Tea Shop password reset code".to_string(),
            text_body: otp_text(user_name, otp, expires_in_minutes),
            html_body: Some(otp_html(user_name, otp, expires_in_minutes)),
        };
        self.send_email(message).await
    }
}

pub fn otp_text(user_name: &str, otp: &str, expires_in_minutes: u64) -> String {
    format!(
        "Hello {user_name},\n\n\
         Use the code below to reset your Tea Shop password:\n\n\
         {otp}\n\n\
         The code expires in {expires_in_minutes} minutes. If you did not ask for a reset, ignore this email.\n\n\
         The Tea Shop Team"
    )
}

pub fn otp_html(user_name: &str, otp: &str, expires_in_minutes: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Password reset code</title></head>
<body style="font-family: Arial, sans-serif; color: #3b2f2f; max-width: 560px; margin: 0 auto;">
    <h2>Tea Shop</h2>
    <p>Hello {user_name},</p>
    <p>Use the code below to reset your password:</p>
    <p style="font-size: 28px; letter-spacing: 6px; font-weight: bold;">{otp}</p>
    <p>The code expires in {expires_in_minutes} minutes. If you did not ask for a reset, ignore this email.</p>
    <p style="font-size: 12px; color: #888;">This is an automated message. Please do not reply.</p>
</body>
</html>"#,
        user_name = html_escape::encode_text(user_name),
        otp = html_escape::encode_text(otp),
    )
}

pub fn build_message(from: &str, email: EmailMessage) -> Result<Message, EmailError> {
    let from_mailbox: Mailbox = from
        .parse()
        .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;
    let to_mailbox: Mailbox = email
        .to
        .parse()
        .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

    let builder = Message::builder().from(from_mailbox).to(to_mailbox).subject(email.subject);

    let result = match email.html_body {
        Some(html) => builder.multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(email.text_body))
                .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html)),
        ),
        None => builder.body(email.text_body),
    };
    result.map_err(|e| EmailError::MessageError(e.to_string()))
}

//! SMTPによるアラート送信（lettre）

use super::{AlertTransport, NotifyError};
use crate::config::{SmtpConfig, SmtpSecurity};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTPトランスポート
#[derive(Clone)]
pub struct SmtpAlertTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpAlertTransport {
    /// SMTP設定からトランスポートを構築
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let builder = match config.security {
            SmtpSecurity::Ssl => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let mut builder = builder.port(config.port);
        if let Some(credentials) = credentials(config) {
            builder = builder.credentials(credentials);
        }

        let from = Mailbox::new(config.from_name.clone(), config.from_email.parse()?);

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }

    /// 送信元
    pub fn from(&self) -> &Mailbox {
        &self.from
    }
}

/// ユーザー名があれば認証する（パスワード未設定は空文字列）
fn credentials(config: &SmtpConfig) -> Option<Credentials> {
    config.username.as_ref().map(|username| {
        Credentials::new(
            username.clone(),
            config.password.clone().unwrap_or_default(),
        )
    })
}

#[async_trait]
impl AlertTransport for SmtpAlertTransport {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(message).await?;
        Ok(())
    }
}

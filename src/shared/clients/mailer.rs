use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use crate::shared::config::AppConfig;

/// 발송할 메일
/// Outgoing mail message
#[derive(Debug, Clone, Serialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// 메일 발송 인터페이스
/// Mail delivery abstraction
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<()>;
}

/// 메일 API 클라이언트
/// 역할: NestJS의 HttpClient로 외부 메일 서비스를 호출하는 것과 같음
/// JSON POST to a mail provider endpoint
pub struct HttpMailer {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: MailMessage) -> Result<()> {
        tracing::debug!(to = %message.to, endpoint = %self.endpoint, "sending mail");

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header("User-Agent", "budget-api/1.0")
            .json(&message);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to mail API")?;

        // HTTP 상태 코드 확인
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Mail API returned error: {} - {}", status, body);
        }

        Ok(())
    }
}

/// 로그 전용 메일러 (개발 환경, 메일 API 미설정 시)
/// Mailer that only logs the message
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "mail delivery skipped (no MAIL_API_URL configured)"
        );
        Ok(())
    }
}

/// 설정에 맞는 메일러 생성
/// Build the mailer selected by configuration
pub fn mailer_from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>> {
    match &config.mail_api_url {
        Some(url) => Ok(Arc::new(HttpMailer::new(url.clone(), config.mail_api_key.clone())?)),
        None => Ok(Arc::new(LogMailer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        let message = MailMessage {
            from: "no-reply@budget.local".to_string(),
            to: "someone@example.com".to_string(),
            subject: "Invitation".to_string(),
            text: "hello".to_string(),
        };
        assert!(LogMailer.send(message).await.is_ok());
    }

    #[test]
    fn test_message_serializes_flat() {
        let message = MailMessage {
            from: "a@x".to_string(),
            to: "b@x".to_string(),
            subject: "s".to_string(),
            text: "t".to_string(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["to"], "b@x");
        assert_eq!(value["subject"], "s");
    }
}

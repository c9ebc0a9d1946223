use async_trait::async_trait;
use reqwest::{header::CACHE_CONTROL, Client, StatusCode};

use crate::{config::SmsConfig, errors::AppError};

/// Outbound text messages. Any failure is terminal for the calling request.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, number: &str, message: &str) -> Result<(), AppError>;
}

/// Fast2SMS bulk endpoint.
pub struct Fast2Sms {
    client: Client,
    config: SmsConfig,
}

impl Fast2Sms {
    pub fn new(config: SmsConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("failed to build SMS client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SmsGateway for Fast2Sms {
    async fn send(&self, number: &str, message: &str) -> Result<(), AppError> {
        let params = [
            ("authorization", self.config.api_key.as_str()),
            ("sender_id", self.config.sender_id.as_str()),
            ("message", message),
            ("language", "english"),
            ("route", "p"),
            ("numbers", number),
        ];

        let response = self
            .client
            .post(&self.config.api_url)
            .header(CACHE_CONTROL, "no-cache")
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("SMS dispatch to {} failed: {}", number, e);
                AppError::Dependency("Failed to send OTP".to_owned())
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::info!("SMS provider response: {}, {}", status, body);

        if status != StatusCode::OK {
            log::error!("SMS provider rejected message to {}", number);
            return Err(AppError::Dependency("Failed to send OTP".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::{
        matchers::{body_string, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn gateway(server: &MockServer) -> Fast2Sms {
        Fast2Sms::new(SmsConfig {
            api_url: format!("{}/dev/bulkV2", server.uri()),
            api_key: "test-key".to_owned(),
            sender_id: "FSTSMS".to_owned(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_the_message_as_a_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dev/bulkV2"))
            .and(header("cache-control", "no-cache"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(
                "authorization=test-key&sender_id=FSTSMS&message=Your+code+is+123456\
                 &language=english&route=p&numbers=%2B919876543210",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"return":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        gateway(&server)
            .send("+919876543210", "Your code is 123456")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn provider_errors_are_dispatch_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server).send("+919876543210", "Your code is 123456").await;
        assert!(matches!(
            result,
            Err(AppError::Dependency(ref msg)) if msg == "Failed to send OTP"
        ));
    }

    #[tokio::test]
    async fn non_200_success_codes_also_fail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let result = gateway(&server).send("+919876543210", "hello").await;
        assert!(matches!(result, Err(AppError::Dependency(_))));
    }
}

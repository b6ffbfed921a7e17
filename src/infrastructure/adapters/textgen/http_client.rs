//! HTTP TextGen Client - 调用外部文本生成 HTTP 服务
//!
//! 实现 TextGenPort trait，通过 HTTP 调用外部生成服务
//!
//! 外部生成 API:
//! POST {base_url}/v1/complete
//! Request: {"prompt": "..."}  (JSON)
//! Response: {"text": "..."}  (JSON)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{CompletionRequest, CompletionResponse, TextGenError, TextGenPort};

/// 生成请求体 (JSON)
#[derive(Debug, Serialize)]
struct CompleteHttpRequest<'a> {
    /// 完整提示词
    prompt: &'a str,
}

/// 生成响应体 (JSON)
#[derive(Debug, Deserialize)]
struct CompleteHttpResponse {
    text: String,
}

/// HTTP TextGen 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTextGenClientConfig {
    /// 生成服务基础 URL
    pub base_url: String,
    /// API Key（置于 Authorization: Bearer 头，空则不发送）
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTextGenClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: String::new(),
            timeout_secs: 120,
        }
    }
}

impl HttpTextGenClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TextGen 客户端
///
/// 通过 HTTP 调用外部生成服务；服务被视为不可信黑盒，单次调用不重试
pub struct HttpTextGenClient {
    client: Client,
    config: HttpTextGenClientConfig,
}

impl HttpTextGenClient {
    /// 创建新的 HTTP TextGen 客户端
    pub fn new(config: HttpTextGenClientConfig) -> Result<Self, TextGenError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TextGenError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取补全 URL
    fn complete_url(&self) -> String {
        format!("{}/v1/complete", self.config.base_url)
    }

    /// 获取健康检查 URL
    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }
}

#[async_trait]
impl TextGenPort for HttpTextGenClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, TextGenError> {
        tracing::debug!(
            url = %self.complete_url(),
            prompt_len = request.context.len(),
            "Sending completion request"
        );

        let mut builder = self.client.post(self.complete_url()).json(&CompleteHttpRequest {
            prompt: &request.context,
        });
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TextGenError::Timeout
            } else if e.is_connect() {
                TextGenError::NetworkError(format!("Cannot connect to generation service: {}", e))
            } else {
                TextGenError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TextGenError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: CompleteHttpResponse = response
            .json()
            .await
            .map_err(|e| TextGenError::InvalidResponse(e.to_string()))?;

        if body.text.is_empty() {
            return Err(TextGenError::InvalidResponse(
                "generation service returned empty text".to_string(),
            ));
        }

        Ok(CompletionResponse { text: body.text })
    }

    async fn health_check(&self) -> bool {
        match self.client.get(self.health_url()).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

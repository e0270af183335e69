/// 摘要服务客户端
///
/// 封装所有与远程摘要接口相关的调用逻辑
use crate::config::Config;
use crate::error::FulfillmentError;
use crate::models::GenerationParams;
use crate::utils::logging::truncate_text;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// 服务返回的摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// 正常返回的摘要文本
    Text(String),
    /// 状态码成功但没有 `summarized_text` 字段
    Degraded,
}

/// 摘要能力
///
/// 编排层只依赖这个 trait，测试时可替换为假实现
pub trait Summarizer {
    /// 发送一次摘要请求
    fn summarize(
        &self,
        prompt: &str,
        format: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<Summary, FulfillmentError>> + Send;
}

/// 请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeRequest<'a> {
    text: &'a str,
    format: &'a str,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// 成功响应
#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    summarized_text: Option<String>,
}

/// 错误响应
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// 摘要服务 HTTP 客户端
#[derive(Debug, Clone)]
pub struct FulfillmentClient {
    http: reqwest::Client,
    endpoint: String,
}

impl FulfillmentClient {
    /// 创建新的摘要客户端
    pub fn new(config: &Config) -> Result<Self, FulfillmentError> {
        Self::with_endpoint(&config.endpoint_url, config.request_timeout())
    }

    /// 使用自定义地址和超时创建
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FulfillmentError> {
        let endpoint = endpoint.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FulfillmentError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        Ok(Self { http, endpoint })
    }

    /// 发送摘要请求
    ///
    /// # 参数
    /// - `prompt`: 代入数据后的提示词
    /// - `format`: 摘要格式说明
    /// - `params`: 生成参数
    ///
    /// # 返回
    /// 成功返回摘要；非 2xx、网络错误、响应无法解析都返回 `FulfillmentError`
    pub async fn summarize(
        &self,
        prompt: &str,
        format: &str,
        params: &GenerationParams,
    ) -> Result<Summary, FulfillmentError> {
        // 服务端对这两种情况直接返回 400，这里提前拒绝
        if prompt.is_empty() {
            return Err(FulfillmentError::Rejected {
                reason: "No text provided".to_string(),
            });
        }
        if format.is_empty() {
            return Err(FulfillmentError::Rejected {
                reason: "Summarization format is required".to_string(),
            });
        }

        let body = SummarizeRequest {
            text: prompt,
            format,
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            model: params.model.as_deref(),
        };

        debug!("正在调用摘要服务: {}", self.endpoint);
        debug!("提示词: {}", truncate_text(prompt, 120));

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.error);
            warn!("摘要服务返回错误状态 {}: {:?}", status.as_u16(), message);
            return Err(FulfillmentError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SummarizeResponse = serde_json::from_str(&text)
            .map_err(|source| FulfillmentError::MalformedPayload { source })?;

        match parsed.summarized_text {
            Some(summary) if !summary.is_empty() => {
                debug!("摘要服务调用成功");
                Ok(Summary::Text(summary))
            }
            _ => {
                warn!("摘要服务响应缺少 summarized_text 字段");
                Ok(Summary::Degraded)
            }
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> FulfillmentError {
        if error.is_timeout() {
            FulfillmentError::Timeout {
                endpoint: self.endpoint.clone(),
            }
        } else {
            FulfillmentError::Transport {
                endpoint: self.endpoint.clone(),
                source: error,
            }
        }
    }
}

impl Summarizer for FulfillmentClient {
    async fn summarize(
        &self,
        prompt: &str,
        format: &str,
        params: &GenerationParams,
    ) -> Result<Summary, FulfillmentError> {
        FulfillmentClient::summarize(self, prompt, format, params).await
    }
}

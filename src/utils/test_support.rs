//! 测试用的假摘要服务

use crate::clients::{Summarizer, Summary};
use crate::error::FulfillmentError;
use crate::models::GenerationParams;
use std::sync::Mutex;

type Responder = Box<dyn Fn(usize, &str) -> Result<Summary, FulfillmentError> + Send + Sync>;

/// 按调用序号决定返回值，并记录每次收到的提示词
pub struct ScriptedSummarizer {
    responder: Responder,
    calls: Mutex<Vec<(String, String, GenerationParams)>>,
}

impl ScriptedSummarizer {
    pub fn new(
        responder: impl Fn(usize, &str) -> Result<Summary, FulfillmentError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 总是返回 "summary of <prompt>"
    pub fn echo() -> Self {
        Self::new(|_, prompt| Ok(Summary::Text(format!("summary of {}", prompt))))
    }

    /// 第 `index` 次调用（从 0 开始）返回给定状态码，其余正常
    pub fn failing_at(index: usize, status: u16) -> Self {
        Self::new(move |call, prompt| {
            if call == index {
                Err(FulfillmentError::Status {
                    status,
                    message: Some("Summarization failed".to_string()),
                })
            } else {
                Ok(Summary::Text(format!("summary of {}", prompt)))
            }
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _, _)| prompt.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<(String, String, GenerationParams)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Summarizer for ScriptedSummarizer {
    async fn summarize(
        &self,
        prompt: &str,
        format: &str,
        params: &GenerationParams,
    ) -> Result<Summary, FulfillmentError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((prompt.to_string(), format.to_string(), params.clone()));
            calls.len() - 1
        };
        (self.responder)(index, prompt)
    }
}

//! LLM客户端 - 对chat-completions服务的统一调用接口

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::config::LLMConfig;
use crate::llm::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

pub mod utils;

/// 聊天补全能力的抽象，管道各阶段只依赖该trait，便于在测试中替换为桩实现
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// 发送一组按顺序排列的消息，返回第一条回复的文本内容。
    ///
    /// 该方法永远返回文本：任何网络或API层面的失败都会降级为
    /// 内嵌错误信息的哨兵字符串，而不是向调用方抛出错误。
    async fn complete(&self, messages: &[ChatMessage]) -> String;
}

/// LLM客户端 - 单次同步请求，无重试、无超时配置、无流式输出
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    http: Client,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self { config, http })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatCompletion for LLMClient {
    async fn complete(&self, messages: &[ChatMessage]) -> String {
        if messages.is_empty() {
            return "[LLM API 错误] 请求消息不能为空".to_string();
        }

        let payload = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let response = match self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return format!("[LLM API 错误] 请求失败: {}", e),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return format!("[LLM API 错误] {}: {}", status.as_u16(), body);
        }

        match response.json::<ChatCompletionResponse>().await {
            Ok(parsed) => match parsed.choices.into_iter().next() {
                Some(choice) => choice.message.content,
                None => "[LLM API 错误] 响应中没有可用的回复".to_string(),
            },
            Err(e) => format!("[LLM API 错误] 响应解析失败: {}", e),
        }
    }
}

//! 联网搜索客户端 - 调用远程搜索服务获取市场资讯原文

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SearchConfig;

/// 搜索失败的类型化错误，由调用方决定如何降级
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("搜索服务返回错误状态: {0}")]
    BadStatus(u16),
    #[error("搜索结果为空")]
    EmptyResults,
}

/// 联网搜索能力的抽象，管道阶段只依赖该trait，便于在测试中替换为桩实现
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 执行一次搜索，返回首条结果的原文内容；任何失败都以错误返回
    async fn search(&self, query: &str) -> Result<String>;
}

/// 搜索请求体
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    include_raw_content: bool,
}

/// 搜索响应体，只消费results数组首个元素的content字段
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResultItem {
    #[serde(default)]
    content: String,
}

/// 搜索客户端 - 单次同步请求，无重试、无超时配置
#[derive(Clone)]
pub struct SearchClient {
    config: SearchConfig,
    http: Client,
}

impl SearchClient {
    /// 创建新的搜索客户端
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self { config, http })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.api_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchProvider for SearchClient {
    async fn search(&self, query: &str) -> Result<String> {
        let payload = SearchRequest {
            query,
            include_raw_content: true,
        };

        let response = self
            .http
            .post(self.search_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::BadStatus(status.as_u16()).into());
        }

        let parsed: SearchResponse = response.json().await?;
        match parsed.results.into_iter().next() {
            Some(first) if !first.content.is_empty() => Ok(first.content),
            _ => Err(SearchError::EmptyResults.into()),
        }
    }
}

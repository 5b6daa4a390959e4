use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 目标语言
    pub target_language: TargetLanguage,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 联网搜索配置
    pub search: SearchConfig,

    /// 管道能力配置
    pub pipeline: PipelineConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 模型标识
    pub model: String,

    /// 采样温度
    pub temperature: f64,
}

/// 联网搜索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// 搜索服务API KEY
    pub api_key: String,

    /// 搜索服务API基地址
    pub api_base_url: String,
}

/// 管道能力配置：搜索增强与推理过程提取在构建时选定
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PipelineConfig {
    /// 是否启用联网搜索阶段
    pub enable_search: bool,

    /// 是否提取报告中的推理过程
    pub enable_trace: bool,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: TargetLanguage::default(),
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            pipeline: PipelineConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("CHUHAI_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.groq.com/openai/v1"),
            model: String::from("deepseek-r1-distill-llama-70b"),
            temperature: 0.7,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("CHUHAI_SEARCH_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.tavily.com"),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enable_search: true,
            enable_trace: true,
        }
    }
}

use crate::config::Config;
use crate::i18n::TargetLanguage;
use clap::Parser;
use std::path::PathBuf;

/// chuhai-advisor - 由Rust与AI驱动的企业出海顾问助手
#[derive(Parser, Debug)]
#[command(name = "chuhai-advisor")]
#[command(
    about = "AI-based going-abroad business advisor. It extracts a company's target country and industry, optionally enriches the profile with a live web search, and generates a structured advisory report."
)]
#[command(version)]
pub struct Args {
    /// 单次模式：直接给出企业出海背景描述，生成一份报告后退出
    #[arg(short, long)]
    pub input: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 模型标识
    #[arg(long)]
    pub model: Option<String>,

    /// 采样温度
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 搜索服务API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 搜索服务API基地址
    #[arg(long)]
    pub search_api_base_url: Option<String>,

    /// 禁用联网搜索阶段
    #[arg(long)]
    pub no_search: bool,

    /// 禁用推理过程提取
    #[arg(long)]
    pub no_trace: bool,

    /// 目标语言 (zh, en, ja, ko)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置：先加载配置文件（或默认值），再用CLI参数覆盖
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| std::path::PathBuf::from("."))
                .join("chuhai.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        // 覆盖LLM配置
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 覆盖搜索配置
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }
        if let Some(search_api_base_url) = self.search_api_base_url {
            config.search.api_base_url = search_api_base_url;
        }

        // 管道能力配置
        if self.no_search {
            config.pipeline.enable_search = false;
        }
        if self.no_trace {
            config.pipeline.enable_trace = false;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            if let Ok(target_language) = target_language_str.parse::<TargetLanguage>() {
                config.target_language = target_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用默认语言 (中文)",
                    target_language_str
                );
            }
        }

        config.verbose = self.verbose;

        config
    }
}

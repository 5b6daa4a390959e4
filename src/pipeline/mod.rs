//! 出海顾问分析管道
//!
//! 固定的线性阶段序列：信息提取 → [联网洞察] → 报告生成。
//! 单个状态记录贯穿所有阶段，每个字段只由指定阶段写入一次。

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::llm::client::ChatCompletion;
use crate::search::SearchProvider;

pub mod stages;

use stages::PipelineStage;
use stages::insight::MarketInsightStage;
use stages::profile::ProfileExtractor;
use stages::report::ReportGenerator;

/// 结构化企业画像。country与industry在提取阶段完成后必定存在，
/// 提取失败时为"未知"哨兵值；note统一保留，仅在降级时携带模型原文。
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParsedProfile {
    /// 出海国家或地区
    #[serde(alias = "国家")]
    pub country: String,

    /// 企业主营业务或行业
    #[serde(alias = "行业")]
    pub industry: String,

    /// 降级备注：结构化提取失败时保留的模型原始输出
    #[serde(default, alias = "备注")]
    pub note: Option<String>,
}

impl ParsedProfile {
    /// 提取失败时的兜底画像
    pub fn unknown(note: Option<String>) -> Self {
        Self {
            country: stages::profile::UNKNOWN_SENTINEL.to_string(),
            industry: stages::profile::UNKNOWN_SENTINEL.to_string(),
            note,
        }
    }
}

/// 市场洞察的来源：真实搜索结果或降级的模拟内容
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum InsightSource {
    /// 来自搜索服务的真实网页内容
    Live,
    /// 搜索失败后按模板合成的内容
    Synthetic,
}

/// 联网洞察阶段的产出
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MarketInsight {
    /// 经LLM提炼后的市场洞察文本
    pub summary: String,
    /// 洞察来源标记
    pub source: InsightSource,
}

/// 管道状态 - 每个用户回合新建一份，随阶段推进逐字段填充
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// 用户原始输入，创建后不可变
    pub user_input: String,

    /// 信息提取阶段写入的结构化画像
    pub parsed_info: Option<ParsedProfile>,

    /// 联网洞察阶段写入的市场洞察
    pub search_result: Option<MarketInsight>,

    /// 报告生成阶段写入的最终报告正文
    pub report: Option<String>,

    /// 报告生成阶段分离出的推理过程
    pub reasoning: Option<String>,
}

impl PipelineState {
    fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            parsed_info: None,
            search_result: None,
            report: None,
            reasoning: None,
        }
    }
}

/// 管道上下文 - 持有各阶段共享的外部服务客户端与配置
#[derive(Clone)]
pub struct PipelineContext {
    /// LLM调用器
    pub llm: Arc<dyn ChatCompletion>,
    /// 搜索调用器，未启用搜索阶段时为None
    pub search: Option<Arc<dyn SearchProvider>>,
    /// 配置
    pub config: Config,
}

/// 管道编排器 - 阶段列表在构建时按配置能力固定，运行期无分支
pub struct Pipeline {
    context: PipelineContext,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl Pipeline {
    /// 按配置组装管道：搜索阶段与推理提取是可选能力
    pub fn new(context: PipelineContext) -> Self {
        let mut stages: Vec<Box<dyn PipelineStage>> = vec![Box::new(ProfileExtractor)];
        if context.config.pipeline.enable_search {
            stages.push(Box::new(MarketInsightStage));
        }
        stages.push(Box::new(ReportGenerator));

        Self { context, stages }
    }

    /// 执行一个完整的用户回合，返回累积后的终态
    ///
    /// 所有外部调用失败都在阶段内部降级为哨兵值，管道总是执行到
    /// 终点并返回带有非空report的状态。
    pub async fn run(&self, user_input: &str) -> Result<PipelineState> {
        let mut state = PipelineState::new(user_input);

        for stage in &self.stages {
            if self.context.config.verbose {
                println!("🤖 执行 {} 阶段...", stage.name());
            }
            stage.execute(&self.context, &mut state).await?;
            if self.context.config.verbose {
                println!("✓ {} 阶段完成", stage.name());
            }
        }

        Ok(state)
    }
}

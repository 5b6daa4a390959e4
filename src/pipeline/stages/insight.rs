//! 联网洞察阶段 - 搜索目标市场资讯并提炼为简短洞察

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::types::ChatMessage;
use crate::pipeline::stages::PipelineStage;
use crate::pipeline::{InsightSource, MarketInsight, ParsedProfile, PipelineContext, PipelineState};

/// 联网洞察阶段
///
/// 从画像派生搜索关键词，取首条搜索结果的原文；搜索失败
/// （传输错误、错误状态或空结果）时合成模板内容继续，
/// 最后都交由LLM提炼为200字以内的洞察。
#[derive(Default)]
pub struct MarketInsightStage;

impl MarketInsightStage {
    /// 由画像派生搜索关键词
    fn build_query(profile: &ParsedProfile) -> String {
        format!("{} {} 出海政策 市场趋势", profile.country, profile.industry)
    }

    /// 搜索失败时的合成内容模板
    fn synthetic_summary(profile: &ParsedProfile) -> String {
        format!(
            "[模拟内容] {} 市场的 {} 行业目前出海活跃，有政府支持、电商平台扩展等趋势。",
            profile.country, profile.industry
        )
    }

    fn distill_prompt(content_summary: &str) -> String {
        format!(
            "你是一个出海市场分析助手，请根据以下网页内容，总结适用于该国家与行业的市场趋势、合规重点或风险警示，控制在200字以内。\n\n网页内容：{}",
            content_summary
        )
    }
}

#[async_trait]
impl PipelineStage for MarketInsightStage {
    fn name(&self) -> &'static str {
        "联网洞察"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let profile = state
            .parsed_info
            .clone()
            .unwrap_or_else(|| ParsedProfile::unknown(None));

        let query = Self::build_query(&profile);
        if context.config.verbose {
            println!("🔍 搜索关键词：{}", query);
        }

        let (content_summary, source) = match &context.search {
            Some(search) => match search.search(&query).await {
                Ok(content) => (content, InsightSource::Live),
                Err(e) => {
                    if context.config.verbose {
                        eprintln!("⚠️ 搜索失败，使用模拟内容继续：{}", e);
                    }
                    (Self::synthetic_summary(&profile), InsightSource::Synthetic)
                }
            },
            None => (Self::synthetic_summary(&profile), InsightSource::Synthetic),
        };

        let messages = vec![ChatMessage::system(Self::distill_prompt(&content_summary))];
        let summary = context.llm.complete(&messages).await;

        state.search_result = Some(MarketInsight { summary, source });

        Ok(())
    }
}

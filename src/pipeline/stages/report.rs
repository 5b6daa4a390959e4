//! 报告生成阶段 - 汇总画像与洞察，生成最终出海建议报告

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::client::utils::split_reasoning;
use crate::llm::types::ChatMessage;
use crate::pipeline::stages::PipelineStage;
use crate::pipeline::{ParsedProfile, PipelineContext, PipelineState};

/// 启用推理提取但回复中没有定界段时的哨兵值
pub const NO_TRACE_SENTINEL: &str = "（未返回推理过程）";

/// 模型回复为空时的占位报告，保证report字段永远非空
pub const EMPTY_REPLY_SENTINEL: &str = "（模型未返回内容，请稍后重试。）";

/// 报告生成阶段，管道的终点
///
/// 将结构化画像与市场洞察（若有）嵌入系统提示词生成报告；
/// 启用推理提取时要求模型用<think></think>包裹内部推理，
/// 并在后处理中把推理段从可见正文中分离出来。
#[derive(Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    fn build_prompt(
        profile: &ParsedProfile,
        insight: Option<&str>,
        context: &PipelineContext,
    ) -> String {
        let profile_json =
            serde_json::to_string(profile).unwrap_or_else(|_| format!("{:?}", profile));

        let insight_section = match insight {
            Some(text) => format!("2. 市场分析：{}", text),
            None => "2. 市场分析：暂无联网资料，请基于你对该国家与行业的了解，自行推断市场机会与挑战。"
                .to_string(),
        };

        let mut prompt = format!(
            "请基于以下信息撰写一份出海建议报告，结构包含：\n1. 企业背景：{}\n{}\n要求内容连贯，结构清晰，语言专业，不少于150字。{}",
            profile_json,
            insight_section,
            context.config.target_language.prompt_instruction()
        );

        if context.config.pipeline.enable_trace {
            prompt.push_str("\n请先将你的内部推理过程包裹在<think>和</think>标签中，然后再给出正式报告正文。");
        }

        prompt
    }

    /// 回复后处理：分离推理段，保证正文非空
    fn post_process(raw: &str, trace_enabled: bool) -> (String, Option<String>) {
        let (reasoning, report) = if trace_enabled {
            match split_reasoning(raw) {
                (Some(reasoning), visible) => (Some(reasoning), visible),
                (None, _) => (Some(NO_TRACE_SENTINEL.to_string()), raw.to_string()),
            }
        } else {
            (None, raw.to_string())
        };

        let report = if report.trim().is_empty() {
            EMPTY_REPLY_SENTINEL.to_string()
        } else {
            report
        };

        (report, reasoning)
    }
}

#[async_trait]
impl PipelineStage for ReportGenerator {
    fn name(&self) -> &'static str {
        "报告生成"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let profile = state
            .parsed_info
            .clone()
            .unwrap_or_else(|| ParsedProfile::unknown(None));
        let insight = state.search_result.as_ref().map(|i| i.summary.as_str());

        let messages = vec![ChatMessage::system(Self::build_prompt(
            &profile, insight, context,
        ))];
        let raw = context.llm.complete(&messages).await;

        let (report, reasoning) = Self::post_process(&raw, context.config.pipeline.enable_trace);
        state.report = Some(report);
        state.reasoning = reasoning;

        Ok(())
    }
}

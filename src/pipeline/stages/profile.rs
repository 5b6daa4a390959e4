//! 信息提取阶段 - 从自由文本中识别企业出海背景

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::client::utils::extract_parsable_body;
use crate::llm::types::ChatMessage;
use crate::pipeline::stages::PipelineStage;
use crate::pipeline::{ParsedProfile, PipelineContext, PipelineState};

/// 提取失败时country与industry的哨兵值
pub const UNKNOWN_SENTINEL: &str = "未知";

const EXTRACT_SYSTEM_PROMPT: &str = r#"你是一个出海顾问助手，需要用户提供完整的企业出海背景后才能进行分析。
请提取以下字段：
- country：出海国家或地区（必填）
- industry：企业主营业务或行业（必填）
请以 JSON 对象格式返回字段值，不要输出其他内容。"#;

/// 信息提取阶段
///
/// 要求LLM以JSON对象返回country与industry两个必填字段，
/// 并对返回文本做严格JSON解析。解析失败、类型不符或字段缺失时
/// 降级为"未知"画像并在note中保留模型原文，管道照常继续。
#[derive(Default)]
pub struct ProfileExtractor;

impl ProfileExtractor {
    /// 严格解析模型回复。这里只接受JSON对象，绝不把模型输出当作代码求值。
    fn parse_reply(content: &str) -> ParsedProfile {
        let body = extract_parsable_body(content);
        match serde_json::from_str::<ParsedProfile>(&body) {
            Ok(profile) if !profile.country.is_empty() && !profile.industry.is_empty() => profile,
            _ => ParsedProfile::unknown(Some(content.to_string())),
        }
    }
}

#[async_trait]
impl PipelineStage for ProfileExtractor {
    fn name(&self) -> &'static str {
        "信息提取"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let messages = vec![
            ChatMessage::system(EXTRACT_SYSTEM_PROMPT),
            ChatMessage::user(state.user_input.clone()),
        ];

        let content = context.llm.complete(&messages).await;
        state.parsed_info = Some(Self::parse_reply(&content));

        Ok(())
    }
}

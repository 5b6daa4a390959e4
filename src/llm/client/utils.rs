//! 模型输出的清洗工具
//!
//! 推理型模型的回复常夹带`<think>`推理段和Markdown代码围栏，
//! 在做严格JSON解析或展示正文之前需要先剥离。

use std::sync::LazyLock;

use regex::Regex;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>(.*?)</think>").unwrap());

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\n(.*?)\n?```$").unwrap());

/// 分离回复中的推理段与可见正文。
///
/// 存在`<think>...</think>`定界段时返回`(Some(推理文本), 去除定界段后的正文)`，
/// 两部分均去除首尾空白；不存在时返回`(None, 原文)`。
pub fn split_reasoning(content: &str) -> (Option<String>, String) {
    match THINK_BLOCK.captures(content) {
        Some(captures) => {
            let reasoning = captures[1].trim().to_string();
            let visible = THINK_BLOCK.replace(content, "").trim().to_string();
            (Some(reasoning), visible)
        }
        None => (None, content.to_string()),
    }
}

/// 去除包裹整段内容的Markdown代码围栏（如```json ... ```）
pub fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    match CODE_FENCE.captures(trimmed) {
        Some(captures) => captures[1].trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// 提取模型回复中可供结构化解析的正文：先去推理段，再去代码围栏
pub fn extract_parsable_body(content: &str) -> String {
    let (_, visible) = split_reasoning(content);
    strip_code_fences(&visible)
}

//! 管道阶段：每个阶段执行一次LLM或搜索调用及其本地后处理

use anyhow::Result;
use async_trait::async_trait;

use crate::pipeline::{PipelineContext, PipelineState};

pub mod insight;
pub mod profile;
pub mod report;

/// 管道阶段的统一抽象。阶段读取先前阶段写入的字段，
/// 写入自己负责的字段，互不重叠。
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// 阶段名称，用于进度日志
    fn name(&self) -> &'static str;

    /// 执行本阶段并将产出合并进状态
    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()>;
}

//! 对话前端 - 单次问答或交互式命令行会话

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::llm::client::LLMClient;
use crate::pipeline::{Pipeline, PipelineContext, PipelineState};
use crate::search::{SearchClient, SearchProvider};
use crate::session::Transcript;

/// 启动对话前端
///
/// 提供`--input`时执行单个回合后退出，否则进入交互式循环。
/// 会话记录由前端持有，在每个回合完成后追加，管道不感知。
pub async fn launch(config: &Config, one_shot_input: Option<String>) -> Result<()> {
    let llm = Arc::new(LLMClient::new(config.llm.clone())?);
    let search: Option<Arc<dyn SearchProvider>> = if config.pipeline.enable_search {
        Some(Arc::new(SearchClient::new(config.search.clone())?))
    } else {
        None
    };

    let context = PipelineContext {
        llm,
        search,
        config: config.clone(),
    };
    let pipeline = Pipeline::new(context);
    let mut transcript = Transcript::new();

    if let Some(input) = one_shot_input {
        let state = pipeline.run(&input).await?;
        record_turn(&mut transcript, &state);
        print_turn(&state);
        return Ok(());
    }

    println!("🧭 出海顾问助手 - 请描述您的企业出海背景（输入 exit 退出）");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit" | "退出") {
            break;
        }

        let state = pipeline.run(input).await?;
        record_turn(&mut transcript, &state);
        print_turn(&state);
    }

    Ok(())
}

/// 回合完成后追加会话记录
fn record_turn(transcript: &mut Transcript, state: &PipelineState) {
    transcript.append_user(&state.user_input);
    if let Some(report) = &state.report {
        transcript.append_assistant(report);
    }
}

fn print_turn(state: &PipelineState) {
    if let Some(reasoning) = &state.reasoning {
        println!("\n💭 推理过程\n{}", reasoning);
    }
    println!("\n=== 出海建议报告 ===");
    if let Some(report) = &state.report {
        println!("{}\n", report);
    }
}

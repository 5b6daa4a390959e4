pub mod chat;
pub mod cli;
pub mod config;
pub mod i18n;
pub mod llm;
pub mod pipeline;
pub mod search;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{Pipeline, PipelineContext, PipelineState};

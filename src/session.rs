//! 会话记录 - 由对话前端持有的只追加日志
//!
//! 管道本身不读写会话记录；前端在一个回合完成后才追加消息，
//! 不存在并发写入。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::types::MessageRole;

/// 单条会话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// 只追加的会话记录
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条用户消息
    pub fn append_user(&mut self, content: impl Into<String>) {
        self.append(MessageRole::User, content.into());
    }

    /// 追加一条助手消息
    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.append(MessageRole::Assistant, content.into());
    }

    fn append(&mut self, role: MessageRole, content: String) {
        self.entries.push(TranscriptEntry {
            id: Uuid::new_v4(),
            role,
            content,
            created_at: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! In-Memory Activity Store Adapter
//!
//! Implements every storage port over plain vectors. Used by tests and by
//! dry runs of the binary when no database is configured.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::activity::{
    MessageActivitySummary, MessageRecord, MessageSample, VoiceActivitySummary,
};
use crate::domain::attendance::CompletedSession;
use crate::domain::foundation::{DomainError, ErrorCode, GuildId, MemberId, MessageId};
use crate::ports::{ActivityReader, MessageStore, SessionStore};

/// In-memory storage for sessions and messages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityStore {
    sessions: Arc<RwLock<Vec<CompletedSession>>>,
    messages: Arc<RwLock<Vec<MessageRecord>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryActivityStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose writes always fail
    pub fn failing() -> Self {
        let store = Self::new();
        store.set_failing(true);
        store
    }

    /// Toggle simulated write failures
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All stored sessions, in insertion order
    pub async fn sessions(&self) -> Vec<CompletedSession> {
        self.sessions.read().await.clone()
    }

    /// All stored messages, in insertion order
    pub async fn messages(&self) -> Vec<MessageRecord> {
        self.messages.read().await.clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
        self.messages.write().await.clear();
    }

    fn check_writable(&self, what: &str) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Simulated {} failure", what),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemoryActivityStore {
    async fn insert_session(&self, session: &CompletedSession) -> Result<(), DomainError> {
        self.check_writable("session insert")?;
        self.sessions.write().await.push(session.clone());
        Ok(())
    }
}

#[async_trait]
impl MessageStore for InMemoryActivityStore {
    async fn insert_message(&self, record: &MessageRecord) -> Result<(), DomainError> {
        self.check_writable("message insert")?;
        self.messages.write().await.push(record.clone());
        Ok(())
    }

    async fn delete_message(&self, message_id: &MessageId) -> Result<u64, DomainError> {
        self.check_writable("message delete")?;
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| &m.message_id != message_id);
        Ok((before - messages.len()) as u64)
    }
}

#[async_trait]
impl ActivityReader for InMemoryActivityStore {
    async fn top_users_by_message_count(
        &self,
        guild_id: &GuildId,
    ) -> Result<Vec<MessageActivitySummary>, DomainError> {
        let messages = self.messages.read().await;
        let mut per_user: BTreeMap<&MemberId, (i64, u64)> = BTreeMap::new();
        for m in messages.iter().filter(|m| &m.guild_id == guild_id) {
            let entry = per_user.entry(&m.user_id).or_default();
            entry.0 += 1;
            entry.1 += u64::from(m.content_length);
        }

        let mut summaries: Vec<MessageActivitySummary> = per_user
            .into_iter()
            .map(|(user_id, (count, total_len))| MessageActivitySummary {
                user_id: user_id.clone(),
                message_count: count,
                average_length: total_len as f64 / count as f64,
            })
            .collect();
        summaries.sort_by(|a, b| b.message_count.cmp(&a.message_count));
        Ok(summaries)
    }

    async fn top_users_by_voice_time(
        &self,
        guild_id: &GuildId,
    ) -> Result<Vec<VoiceActivitySummary>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut per_user: BTreeMap<&MemberId, (i64, f64)> = BTreeMap::new();
        for s in sessions.iter().filter(|s| s.guild_id() == guild_id) {
            let entry = per_user.entry(s.user_id()).or_default();
            entry.0 += 1;
            entry.1 += s.duration().num_milliseconds() as f64 / 1000.0;
        }

        let mut summaries: Vec<VoiceActivitySummary> = per_user
            .into_iter()
            .map(|(user_id, (count, total))| VoiceActivitySummary {
                user_id: user_id.clone(),
                session_count: count,
                average_duration_secs: total / count as f64,
                total_duration_secs: total,
            })
            .collect();
        summaries.sort_by(|a, b| b.total_duration_secs.total_cmp(&a.total_duration_secs));
        Ok(summaries)
    }

    /// Returns the first `limit` distinct messages in insertion order rather
    /// than a random sample, so tests stay deterministic.
    async fn sample_user_messages(
        &self,
        user_id: &MemberId,
        guild_id: &GuildId,
        limit: u32,
    ) -> Result<Vec<MessageSample>, DomainError> {
        let messages = self.messages.read().await;
        let mut seen = HashSet::new();
        Ok(messages
            .iter()
            .filter(|m| &m.user_id == user_id && &m.guild_id == guild_id)
            .filter(|m| seen.insert(m.message_id.clone()))
            .take(limit as usize)
            .map(|m| MessageSample {
                channel_id: m.channel_id.clone(),
                message_id: m.message_id.clone(),
            })
            .collect())
    }
}

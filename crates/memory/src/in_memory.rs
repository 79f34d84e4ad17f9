//! In-memory slot store — the default conversation memory.

use async_trait::async_trait;
use nudge_core::error::MemoryError;
use nudge_core::memory::ConversationMemory;
use nudge_core::slot::{SlotKind, SlotValue};
use nudge_core::turn::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stores slot values in a map keyed by session and slot kind.
///
/// Sessions come into existence on first write; there is nothing to create
/// or tear down beyond the slots themselves.
pub struct InMemorySlots {
    entries: Arc<RwLock<HashMap<(SessionId, SlotKind), SlotValue>>>,
}

impl InMemorySlots {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySlots {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationMemory for InMemorySlots {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn set(
        &self,
        session: &SessionId,
        kind: SlotKind,
        value: SlotValue,
    ) -> Result<(), MemoryError> {
        self.entries
            .write()
            .await
            .insert((session.clone(), kind), value);
        Ok(())
    }

    async fn get(
        &self,
        session: &SessionId,
        kind: SlotKind,
    ) -> Result<Option<SlotValue>, MemoryError> {
        Ok(self
            .entries
            .read()
            .await
            .get(&(session.clone(), kind))
            .cloned())
    }

    async fn has(&self, session: &SessionId, kind: SlotKind) -> Result<bool, MemoryError> {
        Ok(self
            .entries
            .read()
            .await
            .contains_key(&(session.clone(), kind)))
    }

    async fn delete(&self, session: &SessionId, kind: SlotKind) -> Result<(), MemoryError> {
        self.entries.write().await.remove(&(session.clone(), kind));
        Ok(())
    }
}

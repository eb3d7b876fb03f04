use crate::core::errors::MedipassError;
use crate::core::models::audit::AuditEntry;
use crate::infrastructure::audit::AuditLog;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

/// Keeps the most recent `capacity` entries; older ones are dropped. Nothing
/// survives a restart.
#[derive(Clone)]
pub struct InMemoryAuditLog {
    entries: Arc<RwLock<VecDeque<AuditEntry>>>,
    capacity: usize,
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        InMemoryAuditLog {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, entry: AuditEntry) -> Result<(), MedipassError> {
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
        Ok(())
    }

    async fn entries_for_patient(&self, patient_id: &str) -> Result<Vec<AuditEntry>, MedipassError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.patient_id.as_deref() == Some(patient_id))
            .cloned()
            .collect())
    }
}

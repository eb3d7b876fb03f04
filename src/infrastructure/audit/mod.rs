pub mod in_memory;

use crate::core::errors::MedipassError;
use crate::core::models::audit::AuditEntry;
use async_trait::async_trait;

/// Append-only record of who touched which patient data. The live data source
/// persists entries next to the records they describe; the demo store keeps a
/// bounded in-memory window.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<(), MedipassError>;
    /// Entries touching the patient, newest first.
    async fn entries_for_patient(&self, patient_id: &str) -> Result<Vec<AuditEntry>, MedipassError>;
}

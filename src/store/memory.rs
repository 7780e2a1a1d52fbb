use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::Mutex;

use super::{ActivityLog, ClientStore};
use crate::error::StoreError;
use crate::pipeline::{ActivityEntry, Client, Stage};

/// Test double for both store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    clients: Mutex<BTreeMap<String, Client>>,
    entries: Mutex<Vec<ActivityEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded entry across all clients.
    pub async fn all_entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().await.clone()
    }
}

impl ClientStore for MemoryStore {
    async fn create_client(&self, client: &Client) -> Result<(), StoreError> {
        self.clients
            .lock()
            .await
            .insert(client.id.clone(), client.clone());
        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> Result<Client, StoreError> {
        self.clients
            .lock()
            .await
            .get(client_id)
            .cloned()
            .ok_or_else(|| StoreError::ClientNotFound(client_id.to_string()))
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        Ok(self.clients.lock().await.values().cloned().collect())
    }

    async fn update_stage(&self, client_id: &str, stage: Stage) -> Result<(), StoreError> {
        let mut clients = self.clients.lock().await;
        let client = clients
            .get_mut(client_id)
            .ok_or_else(|| StoreError::ClientNotFound(client_id.to_string()))?;
        client.stage = stage;
        client.updated_at = Utc::now();
        Ok(())
    }
}

impl ActivityLog for MemoryStore {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), StoreError> {
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, client_id: &str) -> Result<Vec<ActivityEntry>, StoreError> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .filter(|e| e.client_id == client_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StageChangeRequest;

    #[tokio::test]
    async fn update_stage_changes_only_target_client() {
        let store = MemoryStore::new();
        let a = Client::new("A".into());
        let b = Client::new("B".into());
        store.create_client(&a).await.unwrap();
        store.create_client(&b).await.unwrap();

        store.update_stage(&a.id, Stage::AuditScheduled).await.unwrap();

        assert_eq!(store.get_client(&a.id).await.unwrap().stage, Stage::AuditScheduled);
        assert_eq!(store.get_client(&b.id).await.unwrap().stage, Stage::Lead);
    }

    #[tokio::test]
    async fn update_unknown_client_fails() {
        let store = MemoryStore::new();
        let err = store.update_stage("missing", Stage::Won).await.unwrap_err();
        assert!(matches!(err, StoreError::ClientNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn entries_are_filtered_and_ordered() {
        let store = MemoryStore::new();
        for (client, to) in [("c1", Stage::AuditScheduled), ("c2", Stage::Lost), ("c1", Stage::AuditDone)] {
            let request = StageChangeRequest {
                client_id: client.into(),
                from_stage: Stage::Lead,
                to_stage: to,
                reason: None,
            };
            store
                .append(&ActivityEntry::stage_changed(&request, "u1"))
                .await
                .unwrap();
        }

        let c1: Vec<Stage> = store
            .entries_for("c1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.to_stage)
            .collect();
        assert_eq!(c1, vec![Stage::AuditScheduled, Stage::AuditDone]);
        assert_eq!(store.all_entries().await.len(), 3);
    }
}

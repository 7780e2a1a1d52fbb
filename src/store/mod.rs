//! Persistence collaborators for the pipeline.
//!
//! [`ClientStore`] owns each client's current stage; [`ActivityLog`] is the
//! append-only audit trail. The file-backed [`JsonStore`] implements both; an
//! in-memory double backs the tests.

mod json;
#[cfg(test)]
mod memory;

pub use json::JsonStore;
#[cfg(test)]
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::pipeline::{ActivityEntry, Client, Stage};

#[allow(async_fn_in_trait)]
pub trait ClientStore {
    async fn create_client(&self, client: &Client) -> Result<(), StoreError>;

    async fn get_client(&self, client_id: &str) -> Result<Client, StoreError>;

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError>;

    /// Sets the client's current stage. Unknown ids fail with
    /// [`StoreError::ClientNotFound`].
    async fn update_stage(&self, client_id: &str, stage: Stage) -> Result<(), StoreError>;
}

/// Append-only; no update or delete.
#[allow(async_fn_in_trait)]
pub trait ActivityLog {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), StoreError>;

    /// Entries for one client, in append order.
    async fn entries_for(&self, client_id: &str) -> Result<Vec<ActivityEntry>, StoreError>;
}

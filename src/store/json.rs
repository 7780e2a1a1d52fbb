use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tokio::fs;

use super::{ActivityLog, ClientStore};
use crate::error::StoreError;
use crate::pipeline::{ActivityEntry, Client, Stage};

const CLIENTS_FILE: &str = "clients.json";
const ACTIVITY_FILE: &str = "activity.jsonl";
const LOCK_FILE: &str = ".lock";

/// File-backed store rooted at a data directory.
///
/// Clients live in `clients.json`, replaced atomically on every change.
/// Activity is appended to `activity.jsonl`, one entry per line, and never
/// rewritten. Writers hold an exclusive lock on `.lock` in the data
/// directory, so separate processes sharing the directory do not overwrite
/// each other's changes.
#[derive(Debug)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn clients_path(&self) -> PathBuf {
        self.dir.join(CLIENTS_FILE)
    }

    fn activity_path(&self) -> PathBuf {
        self.dir.join(ACTIVITY_FILE)
    }

    // Readers take no lock: `clients.json` is only ever replaced by rename.
    async fn read_clients(&self) -> Result<Vec<Client>, StoreError> {
        match fs::read_to_string(self.clients_path()).await {
            Ok(contents) => parse_clients(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Runs `f` on the client list under the directory lock and writes the
    /// result back.
    async fn modify_clients<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<Client>) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let dir = self.dir.clone();
        blocking(move || {
            let _lock = lock_dir(&dir)?;
            let path = dir.join(CLIENTS_FILE);
            let mut clients = match std::fs::read_to_string(&path) {
                Ok(contents) => parse_clients(&contents)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
                Err(e) => return Err(e.into()),
            };
            let out = f(&mut clients)?;
            write_atomic(&dir, &path, &serde_json::to_string_pretty(&clients)?)?;
            Ok(out)
        })
        .await
    }
}

fn parse_clients(contents: &str) -> Result<Vec<Client>, StoreError> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(contents)?)
}

/// Opens the lock file and blocks until the exclusive lock is held.
/// The lock is released when the returned handle is dropped.
fn lock_dir(dir: &Path) -> Result<File, StoreError> {
    std::fs::create_dir_all(dir)?;
    let file = File::options()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.join(LOCK_FILE))?;
    file.lock()?;
    Ok(file)
}

fn write_atomic(dir: &Path, path: &Path, contents: &str) -> Result<(), StoreError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn blocking<R, F>(f: F) -> Result<R, StoreError>
where
    F: FnOnce() -> Result<R, StoreError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
}

impl ClientStore for JsonStore {
    async fn create_client(&self, client: &Client) -> Result<(), StoreError> {
        let new = client.clone();
        self.modify_clients(move |clients| {
            clients.retain(|c| c.id != new.id);
            clients.push(new);
            Ok(())
        })
        .await?;
        tracing::debug!(client_id = %client.id, "client created");
        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> Result<Client, StoreError> {
        self.read_clients()
            .await?
            .into_iter()
            .find(|c| c.id == client_id)
            .ok_or_else(|| StoreError::ClientNotFound(client_id.to_string()))
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        self.read_clients().await
    }

    async fn update_stage(&self, client_id: &str, stage: Stage) -> Result<(), StoreError> {
        let id = client_id.to_string();
        self.modify_clients(move |clients| {
            let client = clients
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(StoreError::ClientNotFound(id))?;
            client.stage = stage;
            client.updated_at = Utc::now();
            Ok(())
        })
        .await?;
        tracing::debug!(client_id, %stage, "stage written");
        Ok(())
    }
}

impl ActivityLog for JsonStore {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let dir = self.dir.clone();
        let path = self.activity_path();
        blocking(move || {
            let _lock = lock_dir(&dir)?;
            let mut file = File::options().create(true).append(true).open(path)?;
            file.write_all(line.as_bytes())?;
            file.flush()?;
            Ok(())
        })
        .await
    }

    async fn entries_for(&self, client_id: &str) -> Result<Vec<ActivityEntry>, StoreError> {
        let contents = match fs::read_to_string(self.activity_path()).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            let entry: ActivityEntry = serde_json::from_str(line)?;
            if entry.client_id == client_id {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

use std::collections::{BTreeMap, HashMap};

use tokio::sync::Mutex;

use crate::{
    errors::RemoteError,
    storages::sheets_client::{Rows, SheetsClient},
};

/// In-memory spreadsheet double with write-failure injection
#[derive(Default)]
pub struct MemorySheetsClient {
    documents: Mutex<HashMap<String, BTreeMap<String, Rows>>>,
    // Remaining successful writes before every write fails; None = unlimited
    write_budget: Mutex<Option<usize>>,
}

impl MemorySheetsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an empty document accessible
    pub async fn share(&self, handle: &str) {
        self.documents
            .lock()
            .await
            .insert(handle.to_string(), BTreeMap::new());
    }

    /// Allow `writes` more successful writes, then fail every following one
    pub async fn fail_after_writes(&self, writes: usize) {
        *self.write_budget.lock().await = Some(writes);
    }

    /// Stop failing writes
    pub async fn allow_writes(&self) {
        *self.write_budget.lock().await = None;
    }

    pub async fn section(&self, handle: &str, section: &str) -> Option<Rows> {
        self.documents
            .lock()
            .await
            .get(handle)
            .and_then(|doc| doc.get(section))
            .cloned()
    }

    async fn spend_write(&self) -> Result<(), RemoteError> {
        let mut budget = self.write_budget.lock().await;
        match budget.as_mut() {
            Some(0) => Err(RemoteError::Io("injected write failure".to_string())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn modify_section(
        &self,
        handle: &str,
        section: &str,
        change: impl FnOnce(&mut Rows) + Send,
    ) -> Result<(), RemoteError> {
        self.spend_write().await?;
        let mut documents = self.documents.lock().await;
        let document = documents
            .get_mut(handle)
            .ok_or_else(|| RemoteError::NotAccessible(handle.to_string()))?;
        let rows = document
            .get_mut(section)
            .ok_or_else(|| RemoteError::MissingSection {
                handle: handle.to_string(),
                section: section.to_string(),
            })?;
        change(rows);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SheetsClient for MemorySheetsClient {
    async fn read(&self, handle: &str, section: &str) -> Result<Rows, RemoteError> {
        let documents = self.documents.lock().await;
        let document = documents
            .get(handle)
            .ok_or_else(|| RemoteError::NotAccessible(handle.to_string()))?;
        document
            .get(section)
            .cloned()
            .ok_or_else(|| RemoteError::MissingSection {
                handle: handle.to_string(),
                section: section.to_string(),
            })
    }

    async fn append(&self, handle: &str, section: &str, rows: Rows) -> Result<(), RemoteError> {
        self.modify_section(handle, section, |existing| existing.extend(rows))
            .await
    }

    async fn update(&self, handle: &str, section: &str, rows: Rows) -> Result<(), RemoteError> {
        self.modify_section(handle, section, |existing| *existing = rows)
            .await
    }

    async fn clear(&self, handle: &str, section: &str) -> Result<(), RemoteError> {
        self.modify_section(handle, section, |existing| existing.clear())
            .await
    }

    async fn create_sections(&self, handle: &str, sections: &[&str]) -> Result<(), RemoteError> {
        self.spend_write().await?;
        let mut documents = self.documents.lock().await;
        let document = documents
            .get_mut(handle)
            .ok_or_else(|| RemoteError::NotAccessible(handle.to_string()))?;
        for section in sections {
            document.entry(section.to_string()).or_default();
        }
        Ok(())
    }
}

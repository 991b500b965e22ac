use std::sync::Arc;

use crate::storages::{
    adapter::AdapterSet, provider::BackendProvider, session_storage::SessionStore,
    sheets_client::SheetsClient,
};

/// Sessions, both adapter sets and the remote client share one lifetime
#[derive(Clone)]
pub struct Storage {
    pub sessions: SessionStore,
    pub provider: Arc<BackendProvider>,
    pub sheets: Arc<dyn SheetsClient>,
}

impl Storage {
    /// In-memory sessions and local records, remote records through `sheets`
    pub fn new(sheets: Arc<dyn SheetsClient>) -> Self {
        let sessions = SessionStore::in_memory();
        let provider = BackendProvider::new(
            sessions.clone(),
            AdapterSet::memory(),
            AdapterSet::remote(sheets.clone(), sessions.clone()),
        );
        Self {
            sessions,
            provider: Arc::new(provider),
            sheets,
        }
    }
}

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};

use crate::errors::RemoteError;

pub type Rows = Vec<Vec<String>>;

/// Client for a per-user remote spreadsheet made of named sections of rows
#[async_trait::async_trait]
pub trait SheetsClient: Send + Sync {
    /// Read all rows of a section
    async fn read(&self, handle: &str, section: &str) -> Result<Rows, RemoteError>;

    /// Append rows at the end of a section
    async fn append(&self, handle: &str, section: &str, rows: Rows) -> Result<(), RemoteError>;

    /// Replace the content of a section
    async fn update(&self, handle: &str, section: &str, rows: Rows) -> Result<(), RemoteError>;

    /// Remove all rows of a section
    async fn clear(&self, handle: &str, section: &str) -> Result<(), RemoteError>;

    /// Create the named sections that are missing, existing ones keep their rows
    async fn create_sections(&self, handle: &str, sections: &[&str]) -> Result<(), RemoteError>;
}

/// Serializable structure of one spreadsheet document saved as YAML
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SheetDocument {
    /// Maps section name to its rows
    #[serde(default)]
    pub sections: BTreeMap<String, Rows>,
}

/// Remote storage where every document is a `<handle>.yaml` file in a shared directory.
/// A document is accessible only once the file exists, i.e. it has been shared with the bot.
pub struct YamlSheetsClient {
    storage_dir: PathBuf,
    // Serializes access to the documents, a read never sees a half-written file
    document_lock: Mutex<()>,
}

impl YamlSheetsClient {
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            document_lock: Mutex::new(()),
        }
    }

    fn document_path(&self, handle: &str) -> Result<PathBuf, RemoteError> {
        let valid = !handle.is_empty()
            && handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RemoteError::NotAccessible(handle.to_string()));
        }
        Ok(self.storage_dir.join(format!("{}.yaml", handle)))
    }

    async fn load(&self, handle: &str) -> Result<SheetDocument, RemoteError> {
        let file_path = self.document_path(handle)?;
        let content = match fs::read_to_string(&file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RemoteError::NotAccessible(handle.to_string()));
            }
            Err(e) => return Err(RemoteError::Io(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(SheetDocument::default());
        }
        serde_yaml::from_str(&content).map_err(|e| RemoteError::MalformedDocument {
            handle: handle.to_string(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, handle: &str, document: &SheetDocument) -> Result<(), RemoteError> {
        let file_path = self.document_path(handle)?;
        let content = serde_yaml::to_string(document).map_err(|e| RemoteError::Io(e.to_string()))?;
        fs::write(&file_path, content)
            .await
            .map_err(|e| RemoteError::Io(e.to_string()))
    }

    /// Load, change one existing section, save
    async fn modify_section(
        &self,
        handle: &str,
        section: &str,
        change: impl FnOnce(&mut Rows),
    ) -> Result<(), RemoteError> {
        let _guard = self.document_lock.lock().await;
        let mut document = self.load(handle).await?;
        let rows = document
            .sections
            .get_mut(section)
            .ok_or_else(|| missing_section(handle, section))?;
        change(rows);
        self.save(handle, &document).await
    }
}

fn missing_section(handle: &str, section: &str) -> RemoteError {
    RemoteError::MissingSection {
        handle: handle.to_string(),
        section: section.to_string(),
    }
}

#[async_trait::async_trait]
impl SheetsClient for YamlSheetsClient {
    async fn read(&self, handle: &str, section: &str) -> Result<Rows, RemoteError> {
        let document = {
            let _guard = self.document_lock.lock().await;
            self.load(handle).await?
        };
        document
            .sections
            .get(section)
            .cloned()
            .ok_or_else(|| missing_section(handle, section))
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
        let _guard = self.document_lock.lock().await;
        let mut document = self.load(handle).await?;
        let missing: Vec<&str> = sections
            .iter()
            .copied()
            .filter(|section| !document.sections.contains_key(*section))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        for section in &missing {
            document.sections.insert(section.to_string(), Rows::new());
        }
        log::info!("Created sections {:?} in remote document {}", missing, handle);
        self.save(handle, &document).await
    }
}

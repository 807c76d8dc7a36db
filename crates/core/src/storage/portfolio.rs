use crate::domain::holding::Holding;
use crate::storage::lock::write_lock_for;
use crate::storage::StoreError;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[async_trait::async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// Current holdings in insertion order. A missing document is an empty portfolio.
    async fn load(&self) -> Result<Vec<Holding>, StoreError>;

    /// Appends `holding` unless a holding with the same company name exists.
    /// Returns the resulting portfolio either way.
    async fn add(&self, holding: Holding) -> Result<Vec<Holding>, StoreError>;

    /// Drops every holding named `company_name` and returns what is left.
    async fn remove(&self, company_name: &str) -> Result<Vec<Holding>, StoreError>;
}

/// Portfolio persisted as one pretty-printed JSON array, rewritten whole on
/// every mutation.
#[derive(Debug, Clone)]
pub struct JsonFilePortfolioStore {
    path: PathBuf,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl JsonFilePortfolioStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = write_lock_for(&path);
        Self { path, write_lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Vec<Holding>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    // Write to a sibling file then rename over the document so readers never
    // observe a partial write.
    async fn write_document(&self, holdings: &[Holding]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(holdings).map_err(StoreError::Encode)?;
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, &bytes).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(write_err)?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Returns false when a holding for the same company is already present.
pub fn add_if_absent(holdings: &mut Vec<Holding>, holding: Holding) -> bool {
    if holdings.iter().any(|h| h.name() == holding.name()) {
        return false;
    }
    holdings.push(holding);
    true
}

/// Returns the number of holdings removed.
pub fn remove_by_name(holdings: &mut Vec<Holding>, company_name: &str) -> usize {
    let before = holdings.len();
    holdings.retain(|h| h.name() != company_name);
    before - holdings.len()
}

#[async_trait::async_trait]
impl PortfolioRepository for JsonFilePortfolioStore {
    async fn load(&self) -> Result<Vec<Holding>, StoreError> {
        self.read_document().await
    }

    async fn add(&self, holding: Holding) -> Result<Vec<Holding>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut holdings = self.read_document().await?;
        let name = holding.name().to_string();
        if add_if_absent(&mut holdings, holding) {
            self.write_document(&holdings).await?;
            tracing::info!(company = %name, holdings = holdings.len(), "holding added");
        } else {
            tracing::debug!(company = %name, "holding already present; add skipped");
        }
        Ok(holdings)
    }

    async fn remove(&self, company_name: &str) -> Result<Vec<Holding>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut holdings = self.read_document().await?;
        let removed = remove_by_name(&mut holdings, company_name);
        self.write_document(&holdings).await?;
        tracing::info!(company = %company_name, removed, holdings = holdings.len(), "holding removed");
        Ok(holdings)
    }
}

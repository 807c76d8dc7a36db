use crate::domain::company::Company;
use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

/// Read-only company dataset, loaded once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CompanyCatalog {
    companies: Vec<Company>,
    by_name: HashMap<String, usize>,
}

impl CompanyCatalog {
    pub fn new(companies: Vec<Company>) -> Self {
        let mut by_name = HashMap::with_capacity(companies.len());
        for (idx, company) in companies.iter().enumerate() {
            if by_name.contains_key(&company.name) {
                tracing::warn!(name = %company.name, idx, "duplicate company name in catalog; keeping first");
                continue;
            }
            by_name.insert(company.name.clone(), idx);
        }
        Self { companies, by_name }
    }

    pub fn from_json_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        let companies: Vec<Company> =
            serde_json::from_slice(bytes).context("company dataset is not a JSON array of companies")?;
        Ok(Self::new(companies))
    }

    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read company dataset {}", path.display()))?;
        let catalog = Self::from_json_slice(&bytes)
            .with_context(|| format!("failed to load company dataset {}", path.display()))?;
        tracing::info!(path = %path.display(), companies = catalog.len(), "company catalog loaded");
        Ok(catalog)
    }

    /// All records in dataset order.
    pub fn all(&self) -> &[Company] {
        &self.companies
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Company> {
        self.by_name.get(name).map(|&idx| &self.companies[idx])
    }
}

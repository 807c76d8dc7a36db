use anyhow::Context;
use serde::Serialize;

use esg_core::analytics::source::StaticDataSource;
use esg_core::analytics::{summarize, PortfolioSummary};
use esg_core::catalog::CompanyCatalog;
use esg_core::client::EsgApiClient;
use esg_core::config::Settings;
use esg_core::domain::company::Company;
use esg_core::domain::holding::Holding;
use esg_core::domain::insight::{compare, CompanyInsight, Comparison};
use esg_core::search::{search, SearchOptions};
use esg_core::storage::portfolio::{JsonFilePortfolioStore, PortfolioRepository};

/// Optional position figures attached when a company is added.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    pub shares: Option<f64>,
    pub avg_price: Option<f64>,
    pub current_price: Option<f64>,
}

impl Position {
    fn apply(self, company: Company) -> Holding {
        let mut holding = Holding::from(company);
        holding.shares = self.shares;
        holding.avg_price = self.avg_price;
        holding.current_price = self.current_price;
        holding
    }
}

/// Where commands are answered: the files on this machine, or a running API.
pub enum Backend {
    Local {
        catalog: CompanyCatalog,
        store: JsonFilePortfolioStore,
        source: StaticDataSource,
        search: SearchOptions,
    },
    Remote(EsgApiClient),
}

impl Backend {
    pub async fn local(settings: &Settings) -> anyhow::Result<Self> {
        let catalog = CompanyCatalog::load(&settings.companies_path).await?;
        Ok(Self::Local {
            catalog,
            store: JsonFilePortfolioStore::new(settings.portfolio_path.clone()),
            source: StaticDataSource {
                carbon_tons_per_dollar: settings.carbon_tons_per_dollar,
            },
            search: settings.search_options(),
        })
    }

    pub fn remote(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::Remote(EsgApiClient::from_settings(settings)?))
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<Company>> {
        match self {
            Self::Local {
                catalog, search: opts, ..
            } => Ok(search(catalog.all(), query, opts)
                .into_iter()
                .cloned()
                .collect()),
            Self::Remote(client) => client.search(query).await.context("search unavailable"),
        }
    }

    pub async fn show(&self, name: &str) -> anyhow::Result<CompanyInsight> {
        match self {
            Self::Local { catalog, .. } => catalog
                .find_by_name(name)
                .map(CompanyInsight::from)
                .with_context(|| format!("unknown company: {name}")),
            Self::Remote(client) => Ok(client.company(name).await?),
        }
    }

    pub async fn compare(&self, names: &[String]) -> anyhow::Result<Comparison> {
        match self {
            Self::Local { catalog, .. } => compare(catalog, names),
            Self::Remote(client) => Ok(client.compare(names).await?),
        }
    }

    pub async fn portfolio(&self) -> anyhow::Result<Vec<Holding>> {
        match self {
            Self::Local { store, .. } => Ok(store.load().await?),
            Self::Remote(client) => Ok(client.portfolio().await?),
        }
    }

    /// Adds a catalog company by exact name.
    pub async fn add(&self, name: &str, position: Position) -> anyhow::Result<Vec<Holding>> {
        match self {
            Self::Local { catalog, store, .. } => {
                let company = catalog
                    .find_by_name(name)
                    .cloned()
                    .with_context(|| format!("unknown company: {name}"))?;
                Ok(store.add(position.apply(company)).await?)
            }
            Self::Remote(client) => {
                let insight = client.company(name).await?;
                Ok(client
                    .add_to_portfolio(&position.apply(insight.company))
                    .await?)
            }
        }
    }

    pub async fn remove(&self, name: &str) -> anyhow::Result<Vec<Holding>> {
        if name.trim().is_empty() {
            anyhow::bail!("Company name is required");
        }
        match self {
            Self::Local { store, .. } => Ok(store.remove(name).await?),
            Self::Remote(client) => Ok(client.remove_from_portfolio(name).await?),
        }
    }

    pub async fn summary(&self) -> anyhow::Result<PortfolioSummary> {
        match self {
            Self::Local { store, source, .. } => {
                let holdings = store.load().await?;
                Ok(summarize(&holdings, source))
            }
            Self::Remote(client) => Ok(client.summary().await?),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{text}");
    Ok(())
}

pub mod analytics;
pub mod catalog;
pub mod client;
pub mod domain;
pub mod search;
pub mod storage;

pub mod config {
    use crate::analytics::source::DEFAULT_CARBON_TONS_PER_DOLLAR;
    use crate::client::DEFAULT_TIMEOUT_SECS;
    use crate::search::{SearchOptions, DEFAULT_LIMIT, DEFAULT_THRESHOLD};
    use anyhow::Context;
    use std::path::PathBuf;
    use std::str::FromStr;

    pub const DEFAULT_COMPANIES_PATH: &str = "data/esg_companies.json";
    pub const DEFAULT_PORTFOLIO_PATH: &str = "portfolio.json";
    pub const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub companies_path: PathBuf,
        pub portfolio_path: PathBuf,
        pub port: u16,
        pub search_threshold: f64,
        pub search_limit: usize,
        pub carbon_tons_per_dollar: f64,
        pub api_url: Option<String>,
        pub api_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let settings = Self {
                companies_path: lookup("COMPANIES_PATH")
                    .unwrap_or_else(|| DEFAULT_COMPANIES_PATH.to_string())
                    .into(),
                portfolio_path: lookup("PORTFOLIO_PATH")
                    .unwrap_or_else(|| DEFAULT_PORTFOLIO_PATH.to_string())
                    .into(),
                port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
                search_threshold: parse_var(&lookup, "SEARCH_THRESHOLD", DEFAULT_THRESHOLD)?,
                search_limit: parse_var(&lookup, "SEARCH_LIMIT", DEFAULT_LIMIT)?,
                carbon_tons_per_dollar: parse_var(
                    &lookup,
                    "CARBON_TONS_PER_DOLLAR",
                    DEFAULT_CARBON_TONS_PER_DOLLAR,
                )?,
                api_url: lookup("ESG_API_URL").filter(|s| !s.trim().is_empty()),
                api_timeout_secs: parse_var(&lookup, "ESG_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
            };

            anyhow::ensure!(
                (0.0..=1.0).contains(&settings.search_threshold),
                "SEARCH_THRESHOLD must be between 0 and 1 (got {})",
                settings.search_threshold
            );
            anyhow::ensure!(settings.search_limit >= 1, "SEARCH_LIMIT must be >= 1");
            Ok(settings)
        }

        pub fn search_options(&self) -> SearchOptions {
            SearchOptions {
                threshold: self.search_threshold,
                limit: self.search_limit,
                ..SearchOptions::default()
            }
        }

        pub fn require_api_url(&self) -> anyhow::Result<&str> {
            self.api_url.as_deref().context("ESG_API_URL is required")
        }
    }

    fn parse_var<T>(
        lookup: &impl Fn(&str) -> Option<String>,
        key: &str,
        default: T,
    ) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match lookup(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("invalid {key}: {raw:?}")),
            None => Ok(default),
        }
    }

}

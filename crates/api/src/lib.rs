use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use esg_core::analytics::source::{PerformancePoint, PortfolioDataSource, StaticDataSource};
use esg_core::analytics::{summarize, PortfolioSummary};
use esg_core::catalog::CompanyCatalog;
use esg_core::config::Settings;
use esg_core::domain::company::Company;
use esg_core::domain::holding::{Holding, PortfolioCompany};
use esg_core::domain::insight::{compare, CompanyInsight, Comparison};
use esg_core::search::{search, SearchOptions};
use esg_core::storage::portfolio::{JsonFilePortfolioStore, PortfolioRepository};

pub mod error;

use error::{ApiError, ApiResult};

/// Everything a handler needs; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CompanyCatalog>,
    pub portfolio: Arc<dyn PortfolioRepository>,
    pub data_source: Arc<dyn PortfolioDataSource>,
    pub search: SearchOptions,
}

impl AppState {
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let catalog = CompanyCatalog::load(&settings.companies_path).await?;
        let portfolio = JsonFilePortfolioStore::new(settings.portfolio_path.clone());
        tracing::info!(path = %portfolio.path().display(), "portfolio document");

        Ok(Self {
            catalog: Arc::new(catalog),
            portfolio: Arc::new(portfolio),
            data_source: Arc::new(StaticDataSource {
                carbon_tons_per_dollar: settings.carbon_tons_per_dollar,
            }),
            search: settings.search_options(),
        })
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/search", get(search_companies))
        .route("/api/companies/:name", get(get_company))
        .route("/api/compare", get(compare_companies))
        .route(
            "/api/portfolio",
            get(list_portfolio)
                .post(add_to_portfolio)
                .delete(remove_from_portfolio),
        )
        .route("/api/portfolio/companies", get(list_portfolio_companies))
        .route("/api/portfolio/summary", get(portfolio_summary))
        .route("/api/portfolio/performance", get(portfolio_performance))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

async fn search_companies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Company>> {
    let query = params.query.unwrap_or_default();
    let found: Vec<Company> = search(state.catalog.all(), &query, &state.search)
        .into_iter()
        .cloned()
        .collect();
    tracing::debug!(query = %query, results = found.len(), "search");
    Json(found)
}

async fn get_company(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<CompanyInsight>> {
    let company = state
        .catalog
        .find_by_name(&name)
        .ok_or_else(|| ApiError::NotFound(format!("unknown company: {name}")))?;
    Ok(Json(CompanyInsight::from(company)))
}

#[derive(Debug, Deserialize)]
struct CompareParams {
    names: Option<String>,
}

async fn compare_companies(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> ApiResult<Json<Comparison>> {
    let names: Vec<String> = params
        .names
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let comparison =
        compare(&state.catalog, &names).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(comparison))
}

async fn list_portfolio(State(state): State<AppState>) -> ApiResult<Json<Vec<Holding>>> {
    Ok(Json(state.portfolio.load().await?))
}

async fn add_to_portfolio(
    State(state): State<AppState>,
    body: Result<Json<Holding>, JsonRejection>,
) -> ApiResult<Json<Vec<Holding>>> {
    let Json(holding) = body?;
    if holding.name().trim().is_empty() {
        return Err(ApiError::BadRequest("Company name is required".to_string()));
    }
    Ok(Json(state.portfolio.add(holding).await?))
}

#[derive(Debug, Deserialize)]
struct RemoveParams {
    #[serde(rename = "companyName")]
    company_name: Option<String>,
}

async fn remove_from_portfolio(
    State(state): State<AppState>,
    Query(params): Query<RemoveParams>,
) -> ApiResult<Json<Vec<Holding>>> {
    let Some(company_name) = params.company_name.filter(|s| !s.trim().is_empty()) else {
        return Err(ApiError::BadRequest("Company name is required".to_string()));
    };
    Ok(Json(state.portfolio.remove(&company_name).await?))
}

async fn list_portfolio_companies(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PortfolioCompany>>> {
    let holdings = state.portfolio.load().await?;
    Ok(Json(holdings.iter().map(PortfolioCompany::from).collect()))
}

async fn portfolio_summary(State(state): State<AppState>) -> ApiResult<Json<PortfolioSummary>> {
    let holdings = state.portfolio.load().await?;
    Ok(Json(summarize(&holdings, state.data_source.as_ref())))
}

async fn portfolio_performance(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PerformancePoint>>> {
    let holdings = state.portfolio.load().await?;
    let as_of = chrono::Utc::now().date_naive();
    let series = state.data_source.performance(&holdings, as_of).await?;
    Ok(Json(series))
}

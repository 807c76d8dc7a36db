use crate::catalog::CompanyCatalog;
use crate::domain::company::{
    Company, EsgPerformance, IndustryStanding, InvestmentGrade, Recommendation, RiskLevel,
};
use serde::{Deserialize, Serialize};

/// Most companies shown side by side in one comparison.
pub const MAX_COMPARE: usize = 4;

// Comparison view flags anything under this risk score as recommended.
const RECOMMENDED_RISK_CEILING: f64 = 25.0;
const GAUGE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyInsight {
    pub company: Company,
    pub esg_score: Option<f64>,
    pub risk_level: RiskLevel,
    pub recommendation: Option<Recommendation>,
    pub investment_grade: Option<InvestmentGrade>,
    pub esg_performance: Option<EsgPerformance>,
    pub industry_standing: Option<IndustryStanding>,
    pub industry_percentile: Option<f64>,
    pub universe_percentile: Option<f64>,
}

impl From<&Company> for CompanyInsight {
    fn from(company: &Company) -> Self {
        Self {
            company: company.clone(),
            esg_score: company.esg_score(),
            risk_level: company.risk_level(),
            recommendation: company.recommendation(),
            investment_grade: company.investment_grade(),
            esg_performance: company.esg_performance(),
            industry_standing: company.industry_standing(),
            industry_percentile: company.industry_percentile(),
            universe_percentile: company.universe_percentile(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub industry_group: String,
    pub country: String,
    pub risk_score: Option<f64>,
    /// Risk score as a share of the 0..=100 gauge.
    pub gauge_percent: Option<f64>,
    pub risk_level: RiskLevel,
    pub recommended: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub entries: Vec<ComparisonEntry>,
    pub unknown: Vec<String>,
}

pub fn compare(catalog: &CompanyCatalog, names: &[String]) -> anyhow::Result<Comparison> {
    anyhow::ensure!(!names.is_empty(), "at least one company name is required");
    anyhow::ensure!(
        names.len() <= MAX_COMPARE,
        "at most {MAX_COMPARE} companies can be compared (got {})",
        names.len()
    );

    let mut entries = Vec::with_capacity(names.len());
    let mut unknown = Vec::new();
    for name in names {
        let Some(company) = catalog.find_by_name(name) else {
            unknown.push(name.clone());
            continue;
        };
        let risk_score = company.risk_score();
        entries.push(ComparisonEntry {
            name: company.name.clone(),
            industry_group: company.industry_group.clone(),
            country: company.country.clone(),
            risk_score,
            gauge_percent: risk_score.map(|s| s / GAUGE_MAX * 100.0),
            risk_level: company.risk_level(),
            recommended: risk_score.is_some_and(|s| s < RECOMMENDED_RISK_CEILING),
        });
    }

    Ok(Comparison { entries, unknown })
}

use crate::domain::company::Company;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Portfolio membership for one company. The company fields are stored inline
/// with the dataset keys; position fields are written only when known. Any
/// other keys a client sent are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(flatten)]
    pub company: Company,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,
    #[serde(rename = "avgPrice", default, skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<f64>,
    #[serde(rename = "currentPrice", default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Holding {
    pub fn name(&self) -> &str {
        &self.company.name
    }

    pub fn market_value(&self) -> f64 {
        self.current_price.unwrap_or(0.0) * self.shares.unwrap_or(0.0)
    }

    pub fn cost_basis(&self) -> f64 {
        self.avg_price.unwrap_or(0.0) * self.shares.unwrap_or(0.0)
    }
}

impl From<Company> for Holding {
    fn from(company: Company) -> Self {
        Self {
            company,
            shares: None,
            avg_price: None,
            current_price: None,
            allocation: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl From<Holding> for Company {
    fn from(holding: Holding) -> Self {
        holding.company
    }
}

/// Numeric view of a holding used by charting clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioCompany {
    pub id: Uuid,
    pub name: String,
    pub esg_score: f64,
    pub risk_rating: f64,
    pub industry_group: String,
    pub market_cap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<f64>,
}

/// Stable id derived from the company name, so the same company always maps to
/// the same id across restarts.
pub fn company_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

impl From<&Holding> for PortfolioCompany {
    fn from(holding: &Holding) -> Self {
        let company = &holding.company;
        Self {
            id: company_id(&company.name),
            name: company.name.clone(),
            esg_score: company.esg_score().unwrap_or(0.0),
            risk_rating: company.risk_score().unwrap_or(0.0),
            industry_group: company.industry_group.clone(),
            // No market data feed; kept for shape compatibility.
            market_cap: 0.0,
            shares: holding.shares,
            avg_price: holding.avg_price,
            current_price: holding.current_price,
            allocation: holding.allocation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::fixtures::company;
    use serde_json::json;

    #[test]
    fn plain_company_round_trips_without_position_keys() {
        let holding = Holding::from(company("Acme Corp", "Retailing", "USA", "18.0"));
        let v = serde_json::to_value(&holding).unwrap();
        assert_eq!(v["Company name"], "Acme Corp");
        assert!(v.get("shares").is_none());
        assert!(v.get("avgPrice").is_none());
    }

    #[test]
    fn accepts_company_shaped_body_with_positions() {
        let raw = json!({
            "Company name": "Acme Corp",
            "Industry group": "Retailing",
            "Risk rating score": "18.0",
            "shares": 10,
            "avgPrice": 12.5,
            "currentPrice": 15.0,
        });
        let holding: Holding = serde_json::from_value(raw).unwrap();
        assert_eq!(holding.name(), "Acme Corp");
        assert_eq!(holding.shares, Some(10.0));
        assert_eq!(holding.market_value(), 150.0);
        assert_eq!(holding.cost_basis(), 125.0);
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let raw = json!({
            "Company name": "Old Co",
            "id": "abc-123",
            "esgScore": 71,
            "shares": 3,
        });
        let holding: Holding = serde_json::from_value(raw).unwrap();
        assert_eq!(holding.shares, Some(3.0));
        assert_eq!(holding.extra.get("id"), Some(&json!("abc-123")));
        assert!(holding.extra.get("Company name").is_none());
        assert!(holding.extra.get("shares").is_none());

        let back = serde_json::to_value(&holding).unwrap();
        assert_eq!(back["id"], "abc-123");
        assert_eq!(back["esgScore"], 71);
        assert_eq!(back["Company name"], "Old Co");
    }

    #[test]
    fn missing_position_counts_as_zero() {
        let holding = Holding::from(company("Acme Corp", "Retailing", "USA", "18.0"));
        assert_eq!(holding.market_value(), 0.0);
        assert_eq!(holding.cost_basis(), 0.0);
    }

    #[test]
    fn normalized_view_has_stable_id_and_numeric_scores() {
        let mut holding = Holding::from(company("Acme Corp", "Retailing", "USA", "18.0"));
        holding.shares = Some(2.0);
        let a = PortfolioCompany::from(&holding);
        let b = PortfolioCompany::from(&holding);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, company_id("Acme Corp"));
        assert_ne!(a.id, company_id("Other Corp"));
        assert_eq!(a.esg_score, 82.0);
        assert_eq!(a.risk_rating, 18.0);
        assert_eq!(a.shares, Some(2.0));

        let back: Company = holding.into();
        assert_eq!(back.name, "Acme Corp");
    }
}

use serde::{Deserialize, Serialize};

/// One catalog record. Field names on the wire follow the dataset's
/// human-readable headers ("Company name", "Risk rating score", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "Company name")]
    pub name: String,
    #[serde(rename = "Industry group", default)]
    pub industry_group: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Full time employees", default)]
    pub full_time_employees: String,
    #[serde(rename = "Risk rating score", default)]
    pub risk_rating_score: String,
    #[serde(rename = "Risk rating assessment", default)]
    pub risk_rating_assessment: String,
    #[serde(rename = "Industry group position", default)]
    pub industry_group_position: String,
    #[serde(rename = "Industry group positions total", default)]
    pub industry_group_positions_total: String,
    #[serde(rename = "Universe position", default)]
    pub universe_position: String,
    #[serde(rename = "Universe positions total", default)]
    pub universe_positions_total: String,
    #[serde(rename = "Company description", default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EsgPerformance {
    Excellent,
    Good,
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndustryStanding {
    #[serde(rename = "Top Tier")]
    TopTier,
    #[serde(rename = "Mid Tier")]
    MidTier,
}

impl Company {
    /// Risk rating score as a number. Lower is better.
    pub fn risk_score(&self) -> Option<f64> {
        parse_decimal(&self.risk_rating_score)
    }

    /// ESG "goodness" score on a 0..=100 scale, the inverse of the risk score.
    pub fn esg_score(&self) -> Option<f64> {
        self.risk_score().map(esg_score_from_risk)
    }

    pub fn employees(&self) -> Option<u64> {
        parse_count(&self.full_time_employees)
    }

    pub fn risk_level(&self) -> RiskLevel {
        let label = self.risk_rating_assessment.to_lowercase();
        if label.contains("low") {
            RiskLevel::Low
        } else if label.contains("medium") {
            RiskLevel::Medium
        } else if label.contains("high") {
            RiskLevel::High
        } else {
            RiskLevel::Unknown
        }
    }

    pub fn recommendation(&self) -> Option<Recommendation> {
        self.risk_score().map(recommendation_for_risk)
    }

    pub fn investment_grade(&self) -> Option<InvestmentGrade> {
        self.esg_score().map(grade_for_esg_score)
    }

    pub fn esg_performance(&self) -> Option<EsgPerformance> {
        let risk = self.risk_score()?;
        Some(if risk < 20.0 {
            EsgPerformance::Excellent
        } else if risk < 30.0 {
            EsgPerformance::Good
        } else if risk < 40.0 {
            EsgPerformance::Average
        } else {
            EsgPerformance::BelowAverage
        })
    }

    pub fn industry_standing(&self) -> Option<IndustryStanding> {
        let ratio = rank_ratio(
            &self.industry_group_position,
            &self.industry_group_positions_total,
        )?;
        Some(if ratio < 0.3 {
            IndustryStanding::TopTier
        } else {
            IndustryStanding::MidTier
        })
    }

    /// Position within the industry group as a percentage of the group size.
    pub fn industry_percentile(&self) -> Option<f64> {
        rank_ratio(
            &self.industry_group_position,
            &self.industry_group_positions_total,
        )
        .map(|r| r * 100.0)
    }

    pub fn universe_percentile(&self) -> Option<f64> {
        rank_ratio(&self.universe_position, &self.universe_positions_total).map(|r| r * 100.0)
    }
}

pub fn esg_score_from_risk(risk: f64) -> f64 {
    (100.0 - risk).max(0.0)
}

pub fn recommendation_for_risk(risk: f64) -> Recommendation {
    if risk < 20.0 {
        Recommendation::Buy
    } else if risk < 30.0 {
        Recommendation::Hold
    } else {
        Recommendation::Sell
    }
}

pub fn grade_for_esg_score(score: f64) -> InvestmentGrade {
    if score > 80.0 {
        InvestmentGrade::APlus
    } else if score > 70.0 {
        InvestmentGrade::A
    } else if score > 60.0 {
        InvestmentGrade::BPlus
    } else if score > 50.0 {
        InvestmentGrade::B
    } else {
        InvestmentGrade::C
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_count(s: &str) -> Option<u64> {
    let digits: String = s.trim().chars().filter(|c| *c != ',').collect();
    digits.parse::<u64>().ok()
}

fn rank_ratio(position: &str, total: &str) -> Option<f64> {
    let position = parse_count(position)?;
    let total = parse_count(total)?;
    if total == 0 {
        return None;
    }
    Some(position as f64 / total as f64)
}


#[cfg(test)]
mod tests {
    use super::fixtures::company;
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_dataset_keys_and_defaults_missing_fields() {
        let raw = json!({
            "Company name": "1&1 AG",
            "Industry group": "Telecommunication Services",
            "Country": "Germany",
            "Full time employees": "3,301",
            "Risk rating score": "27.0",
            "Risk rating assessment": "Medium Risk",
            "Some extra column": "ignored",
        });
        let c: Company = serde_json::from_value(raw).unwrap();
        assert_eq!(c.name, "1&1 AG");
        assert_eq!(c.employees(), Some(3301));
        assert_eq!(c.universe_position, "");
        assert_eq!(c.risk_level(), RiskLevel::Medium);

        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["Company name"], "1&1 AG");
        assert_eq!(back["Risk rating score"], "27.0");
    }

    #[test]
    fn requires_company_name() {
        let raw = json!({ "Industry group": "Retailing" });
        assert!(serde_json::from_value::<Company>(raw).is_err());
    }

    #[test]
    fn heuristics_follow_risk_bands() {
        let low = company("11 Bit Studios SA", "Software & Services", "Poland", "16.3");
        assert_eq!(low.recommendation(), Some(Recommendation::Buy));
        assert_eq!(low.risk_level(), RiskLevel::Low);
        assert_eq!(low.investment_grade(), Some(InvestmentGrade::APlus));
        assert_eq!(low.esg_performance(), Some(EsgPerformance::Excellent));

        let medium = company("1-800-FLOWERS.COM, Inc.", "Retailing", "USA", "28.9");
        assert_eq!(medium.recommendation(), Some(Recommendation::Hold));
        assert_eq!(medium.esg_performance(), Some(EsgPerformance::Good));

        let high = company("Coal Co", "Energy", "USA", "35");
        assert_eq!(high.recommendation(), Some(Recommendation::Sell));
        assert_eq!(high.risk_level(), RiskLevel::High);
        assert_eq!(high.esg_performance(), Some(EsgPerformance::Average));
    }

    #[test]
    fn esg_score_is_clamped_at_zero() {
        assert_eq!(esg_score_from_risk(120.0), 0.0);
        assert!((esg_score_from_risk(16.3) - 83.7).abs() < 1e-9);
        assert_eq!(grade_for_esg_score(50.0), InvestmentGrade::C);
        assert_eq!(grade_for_esg_score(65.0), InvestmentGrade::BPlus);
    }

    #[test]
    fn unparsable_scores_yield_none() {
        let c = company("Mystery Ltd", "Unknown", "Nowhere", "n/a");
        assert_eq!(c.risk_score(), None);
        assert_eq!(c.recommendation(), None);
        assert_eq!(c.investment_grade(), None);
        assert_eq!(c.risk_level(), RiskLevel::Unknown);
    }

    #[test]
    fn industry_standing_uses_rank_ratio() {
        let mut c = company("Acme Corp", "Retailing", "USA", "20");
        assert_eq!(c.industry_standing(), Some(IndustryStanding::TopTier));
        c.industry_group_position = "432".to_string();
        c.industry_group_positions_total = "450".to_string();
        assert_eq!(c.industry_standing(), Some(IndustryStanding::MidTier));
        c.industry_group_positions_total = "0".to_string();
        assert_eq!(c.industry_standing(), None);
        assert_eq!(c.universe_percentile(), Some(50.0));
    }
}

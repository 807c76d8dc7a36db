//! Portfolio aggregates for the dashboard.
//!
//! Everything here is recomputed from a holdings snapshot on each call. Any
//! ratio with a zero denominator resolves to 0 rather than NaN.

pub mod source;

use crate::domain::holding::Holding;
use serde::{Deserialize, Serialize};
use source::PortfolioDataSource;

pub const DEFAULT_RECENT_HOLDINGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAllocation {
    pub industry_group: String,
    pub value: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRow {
    pub name: String,
    pub industry_group: String,
    pub market_value: f64,
    pub cost_basis: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub esg_score: Option<f64>,
    pub allocation_percent: f64,
}

/// Pre-formatted figures; never blank, never "NaN".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    pub total_value: String,
    pub total_return: String,
    pub total_return_percent: String,
    pub average_esg_score: String,
    pub carbon_offset_tons: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub holdings_count: usize,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_return: f64,
    pub total_return_percent: f64,
    pub average_esg_score: f64,
    pub carbon_offset_tons: f64,
    pub sector_allocation: Vec<SectorAllocation>,
    pub holdings: Vec<HoldingRow>,
    pub recent: Vec<HoldingRow>,
    pub display: SummaryDisplay,
}

pub fn total_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::market_value).sum()
}

pub fn total_cost(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::cost_basis).sum()
}

pub fn total_return(holdings: &[Holding]) -> f64 {
    total_value(holdings) - total_cost(holdings)
}

pub fn total_return_percent(holdings: &[Holding]) -> f64 {
    let cost = total_cost(holdings);
    if cost == 0.0 {
        return 0.0;
    }
    finite_or_zero((total_value(holdings) - cost) / cost * 100.0)
}

/// Mean ESG score over holdings with a readable risk score.
pub fn average_esg_score(holdings: &[Holding]) -> f64 {
    let scores: Vec<f64> = holdings
        .iter()
        .filter_map(|h| h.company.esg_score())
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Value per industry group, in order of first appearance.
pub fn sector_allocation(holdings: &[Holding]) -> Vec<SectorAllocation> {
    let mut groups: Vec<SectorAllocation> = Vec::new();
    for holding in holdings {
        let group = &holding.company.industry_group;
        let value = holding.market_value();
        match groups.iter_mut().find(|g| &g.industry_group == group) {
            Some(existing) => existing.value += value,
            None => groups.push(SectorAllocation {
                industry_group: group.clone(),
                value,
                percent: 0.0,
            }),
        }
    }

    let grand_total: f64 = groups.iter().map(|g| g.value).sum();
    for g in &mut groups {
        g.percent = percent_of(g.value, grand_total);
    }
    groups
}

pub fn holding_rows(holdings: &[Holding]) -> Vec<HoldingRow> {
    let total = total_value(holdings);
    holdings.iter().map(|h| holding_row(h, total)).collect()
}

/// The `n` most recently added holdings, newest first.
pub fn recent_holdings(holdings: &[Holding], n: usize) -> Vec<HoldingRow> {
    let total = total_value(holdings);
    holdings
        .iter()
        .rev()
        .take(n)
        .map(|h| holding_row(h, total))
        .collect()
}

fn holding_row(holding: &Holding, portfolio_value: f64) -> HoldingRow {
    let market_value = holding.market_value();
    let cost_basis = holding.cost_basis();
    let pnl = market_value - cost_basis;
    HoldingRow {
        name: holding.company.name.clone(),
        industry_group: holding.company.industry_group.clone(),
        market_value,
        cost_basis,
        pnl,
        pnl_percent: percent_of(pnl, cost_basis),
        esg_score: holding.company.esg_score(),
        allocation_percent: percent_of(market_value, portfolio_value),
    }
}

pub fn summarize(holdings: &[Holding], source: &dyn PortfolioDataSource) -> PortfolioSummary {
    let total_value = total_value(holdings);
    let total_cost = total_cost(holdings);
    let total_return = total_value - total_cost;
    let total_return_percent = total_return_percent(holdings);
    let average_esg_score = average_esg_score(holdings);
    let carbon_offset_tons = source.carbon_offset_tons(total_value);

    PortfolioSummary {
        holdings_count: holdings.len(),
        total_value,
        total_cost,
        total_return,
        total_return_percent,
        average_esg_score,
        carbon_offset_tons,
        sector_allocation: sector_allocation(holdings),
        holdings: holding_rows(holdings),
        recent: recent_holdings(holdings, DEFAULT_RECENT_HOLDINGS),
        display: SummaryDisplay {
            total_value: fmt_metric(total_value),
            total_return: fmt_metric(total_return),
            total_return_percent: fmt_metric(total_return_percent),
            average_esg_score: fmt_metric(average_esg_score),
            carbon_offset_tons: fmt_metric(carbon_offset_tons),
        },
    }
}

/// One decimal place; NaN and infinities render as "0.0".
pub fn fmt_metric(value: f64) -> String {
    format!("{:.1}", finite_or_zero(value))
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    finite_or_zero(part / whole * 100.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::source::StaticDataSource;
    use super::*;
    use crate::domain::company::fixtures::company;

    fn holding(name: &str, industry: &str, risk: &str, shares: f64, avg: f64, cur: f64) -> Holding {
        let mut h = Holding::from(company(name, industry, "USA", risk));
        h.shares = Some(shares);
        h.avg_price = Some(avg);
        h.current_price = Some(cur);
        h
    }

    fn sample() -> Vec<Holding> {
        vec![
            holding("Acme Corp", "Retailing", "20.0", 10.0, 10.0, 12.0),
            holding("Globex", "Energy", "40.0", 5.0, 20.0, 16.0),
            holding("Initech", "Retailing", "30.0", 2.0, 50.0, 70.0),
        ]
    }

    #[test]
    fn empty_portfolio_resolves_to_zeroes() {
        let summary = summarize(&[], &StaticDataSource::default());
        assert_eq!(summary.holdings_count, 0);
        assert_eq!(summary.average_esg_score, 0.0);
        assert_eq!(summary.total_return_percent, 0.0);
        assert!(summary.sector_allocation.is_empty());
        assert_eq!(summary.display.average_esg_score, "0.0");
        assert_eq!(summary.display.total_return_percent, "0.0");
    }

    #[test]
    fn totals_and_returns() {
        let h = sample();
        // 120 + 80 + 140
        assert_eq!(total_value(&h), 340.0);
        // 100 + 100 + 100
        assert_eq!(total_cost(&h), 300.0);
        assert_eq!(total_return(&h), 40.0);
        assert!((total_return_percent(&h) - 13.333_333_333).abs() < 1e-6);
    }

    #[test]
    fn missing_positions_count_as_zero() {
        let bare = vec![Holding::from(company("Acme Corp", "Retailing", "USA", "20.0"))];
        assert_eq!(total_value(&bare), 0.0);
        assert_eq!(total_return_percent(&bare), 0.0);
        let rows = holding_rows(&bare);
        assert_eq!(rows[0].pnl_percent, 0.0);
        assert_eq!(rows[0].allocation_percent, 0.0);
    }

    #[test]
    fn average_esg_skips_unreadable_scores() {
        let mut h = sample();
        assert_eq!(average_esg_score(&h), 70.0);
        h.push(holding("Mystery", "Energy", "n/a", 1.0, 1.0, 1.0));
        assert_eq!(average_esg_score(&h), 70.0);
    }

    #[test]
    fn sector_allocation_groups_in_first_seen_order() {
        let alloc = sector_allocation(&sample());
        assert_eq!(alloc.len(), 2);
        assert_eq!(alloc[0].industry_group, "Retailing");
        assert_eq!(alloc[0].value, 260.0);
        assert_eq!(alloc[1].industry_group, "Energy");
        let sum: f64 = alloc.iter().map(|a| a.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_value_sectors_get_zero_percent() {
        let h = vec![
            Holding::from(company("Acme Corp", "Retailing", "USA", "20.0")),
            Holding::from(company("Globex", "Energy", "USA", "20.0")),
        ];
        let alloc = sector_allocation(&h);
        assert_eq!(alloc.len(), 2);
        assert!(alloc.iter().all(|a| a.percent == 0.0));
    }

    #[test]
    fn recent_holdings_are_newest_first() {
        let mut h = sample();
        h.push(holding("Umbrella", "Pharmaceuticals", "25.0", 1.0, 1.0, 1.0));
        let recent = recent_holdings(&h, DEFAULT_RECENT_HOLDINGS);
        let names: Vec<_> = recent.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Umbrella", "Initech", "Globex"]);
    }

    #[test]
    fn summary_uses_data_source_for_carbon() {
        let source = StaticDataSource {
            carbon_tons_per_dollar: 0.01,
        };
        let summary = summarize(&sample(), &source);
        assert!((summary.carbon_offset_tons - 3.4).abs() < 1e-9);
        assert_eq!(summary.display.carbon_offset_tons, "3.4");
        assert_eq!(summary.display.total_value, "340.0");
        assert_eq!(summary.holdings[1].pnl, -20.0);
        assert_eq!(summary.holdings[1].pnl_percent, -20.0);
    }

    #[test]
    fn fmt_metric_never_renders_nan() {
        assert_eq!(fmt_metric(f64::NAN), "0.0");
        assert_eq!(fmt_metric(f64::INFINITY), "0.0");
        assert_eq!(fmt_metric(82.44), "82.4");
    }
}

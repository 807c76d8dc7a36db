use crate::analytics::total_value;
use crate::domain::holding::Holding;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CARBON_TONS_PER_DOLLAR: f64 = 0.0037;
pub const PERFORMANCE_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Market-facing data the dashboard needs but this service does not own:
/// historical valuations and emissions estimates.
#[async_trait::async_trait]
pub trait PortfolioDataSource: Send + Sync {
    async fn performance(
        &self,
        holdings: &[Holding],
        as_of: NaiveDate,
    ) -> anyhow::Result<Vec<PerformancePoint>>;

    fn carbon_offset_tons(&self, invested_value: f64) -> f64;
}

/// Stand-in source with no market feed: a flat valuation history and a linear
/// carbon estimate.
#[derive(Debug, Clone)]
pub struct StaticDataSource {
    pub carbon_tons_per_dollar: f64,
}

impl Default for StaticDataSource {
    fn default() -> Self {
        Self {
            carbon_tons_per_dollar: DEFAULT_CARBON_TONS_PER_DOLLAR,
        }
    }
}

#[async_trait::async_trait]
impl PortfolioDataSource for StaticDataSource {
    async fn performance(
        &self,
        holdings: &[Holding],
        as_of: NaiveDate,
    ) -> anyhow::Result<Vec<PerformancePoint>> {
        let value = total_value(holdings);
        let mut points = Vec::with_capacity(PERFORMANCE_MONTHS as usize);
        for back in (0..PERFORMANCE_MONTHS).rev() {
            let date = month_end(as_of, back)
                .ok_or_else(|| anyhow::anyhow!("date out of range: {as_of} minus {back} months"))?;
            points.push(PerformancePoint { date, value });
        }
        Ok(points)
    }

    fn carbon_offset_tons(&self, invested_value: f64) -> f64 {
        invested_value * self.carbon_tons_per_dollar
    }
}

// Last day of the month `back` months before `as_of`, capped at `as_of` itself.
fn month_end(as_of: NaiveDate, back: u32) -> Option<NaiveDate> {
    if back == 0 {
        return Some(as_of);
    }
    let first = as_of.with_day(1)?.checked_sub_months(Months::new(back - 1))?;
    first.pred_opt()
}

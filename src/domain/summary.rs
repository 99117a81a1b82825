// Summary aggregates shown above the chart
use super::ridership::Record;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryAggregates {
    pub total_trips: u64,
    pub record_count: usize,
    /// Rounded to one decimal; `None` for an empty view
    pub average_trips: Option<f64>,
    pub active_routes: usize,
}

impl SummaryAggregates {
    pub fn compute(filtered: &[&Record]) -> Self {
        let total_trips: u64 = filtered.iter().map(|r| r.count).sum();
        let record_count = filtered.len();
        let average_trips = (record_count > 0)
            .then(|| (total_trips as f64 / record_count as f64 * 10.0).round() / 10.0);
        let active_routes = filtered
            .iter()
            .map(|r| r.route.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_trips,
            record_count,
            average_trips,
            active_routes,
        }
    }

    pub fn average_display(&self) -> String {
        match self.average_trips {
            Some(avg) => format!("{:.1}", avg),
            None => "N/A".to_string(),
        }
    }
}

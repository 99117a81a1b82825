// Summary panel adapter - the three numeric display slots
use crate::application::views::SummaryView;
use crate::domain::summary::SummaryAggregates;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDisplay {
    pub total_trips: String,
    pub average_trips: String,
    pub active_routes: String,
}

#[derive(Debug)]
pub struct SummaryPanel {
    latest: SummaryAggregates,
}

impl Default for SummaryPanel {
    /// Before the first render the panel shows an empty view
    fn default() -> Self {
        Self {
            latest: SummaryAggregates::compute(&[]),
        }
    }
}

impl SummaryPanel {
    pub fn aggregates(&self) -> &SummaryAggregates {
        &self.latest
    }

    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            total_trips: self.latest.total_trips.to_string(),
            average_trips: self.latest.average_display(),
            active_routes: self.latest.active_routes.to_string(),
        }
    }
}

impl SummaryView for SummaryPanel {
    fn show(&mut self, summary: &SummaryAggregates) {
        self.latest = summary.clone();
    }
}

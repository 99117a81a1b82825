// Render coordinator - drives the summary, chart and map from a filtered view
use crate::application::views::{ChartView, MapView, SummaryView};
use crate::domain::chart::{bars_for, ChartLayout};
use crate::domain::map::markers_for;
use crate::domain::ridership::Record;
use crate::domain::summary::SummaryAggregates;

/// Holds no state of its own; every render recomputes from the filtered
/// view and only the views remember what they drew.
pub struct RenderCoordinator<S, C, M> {
    layout: ChartLayout,
    summary: S,
    chart: C,
    map: M,
}

impl<S, C, M> RenderCoordinator<S, C, M>
where
    S: SummaryView,
    C: ChartView,
    M: MapView,
{
    pub fn new(layout: ChartLayout, summary: S, chart: C, map: M) -> Self {
        Self {
            layout,
            summary,
            chart,
            map,
        }
    }

    pub fn render(&mut self, filtered: &[&Record]) {
        let aggregates = SummaryAggregates::compute(filtered);
        self.summary.show(&aggregates);

        let bars = bars_for(filtered);
        let x = self.layout.x_scale(&bars);
        let y = self.layout.y_scale(&bars);
        self.chart.draw_axes(&x, &y);
        self.chart.reconcile(bars, &x, &y);

        let markers = markers_for(filtered);
        tracing::debug!(
            records = filtered.len(),
            markers = markers.len(),
            "rendered filtered view"
        );
        self.map.clear_markers();
        self.map.draw_all(markers);
    }

    pub fn summary(&self) -> &S {
        &self.summary
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}

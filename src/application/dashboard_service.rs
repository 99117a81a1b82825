// Dashboard service - owns the dataset and renders filter selections
use crate::application::render_coordinator::RenderCoordinator;
use crate::domain::ridership::{Dataset, FilterOptions, FilterSelection};
use crate::domain::summary::SummaryAggregates;
use crate::infrastructure::config::DashboardConfig;
use crate::infrastructure::summary_panel::{SummaryDisplay, SummaryPanel};
use crate::infrastructure::svg_chart::{ChartFrame, ChartStyle, SvgChartView};
use crate::infrastructure::svg_map::{MapFrame, MarkerStyle, SvgMapView};
use serde::Serialize;
use std::sync::Arc;

type DashboardCoordinator = RenderCoordinator<SummaryPanel, SvgChartView, SvgMapView>;

/// Wire the SVG views into a coordinator according to the configuration
fn build_coordinator(config: &DashboardConfig) -> DashboardCoordinator {
    let chart = SvgChartView::new(
        config.chart.layout(),
        ChartStyle {
            bar_color: config.chart.bar_color.clone(),
            transition_ms: config.chart.transition_ms,
            tooltip_fade_in_ms: config.chart.tooltip_fade_in_ms,
            tooltip_fade_out_ms: config.chart.tooltip_fade_out_ms,
        },
    );
    let map = SvgMapView::new(
        config.map.viewport(),
        MarkerStyle {
            radius: config.map.marker_radius,
            color: config.map.marker_color.clone(),
            fill_opacity: config.map.marker_fill_opacity,
        },
    );
    RenderCoordinator::new(config.chart.layout(), SummaryPanel::default(), chart, map)
}

/// Everything the views hold after one render
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDashboard {
    pub selection: FilterSelection,
    pub summary: SummaryAggregates,
    pub summary_display: SummaryDisplay,
    pub chart: ChartFrame,
    pub map: MapFrame,
    #[serde(skip)]
    pub chart_svg: String,
    #[serde(skip)]
    pub map_svg: String,
}

#[derive(Clone)]
pub struct DashboardService {
    dataset: Arc<Dataset>,
    config: Arc<DashboardConfig>,
}

impl DashboardService {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        Self {
            dataset,
            config: Arc::new(config),
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.dataset.filter_options()
    }

    /// Filter the dataset and push the result through a fresh set of views.
    ///
    /// `previous` is the selection the client was showing. It is rendered
    /// first so the chart joins against that client's own bars; without it
    /// every bar enters.
    pub fn render(
        &self,
        selection: FilterSelection,
        previous: Option<&FilterSelection>,
    ) -> RenderedDashboard {
        let mut coordinator = build_coordinator(&self.config);
        if let Some(previous) = previous {
            coordinator.render(&previous.apply(&self.dataset));
        }

        let filtered = selection.apply(&self.dataset);
        tracing::info!(
            day = selection.day.as_str(),
            route = selection.route.as_str(),
            records = filtered.len(),
            replayed = previous.is_some(),
            "Rendering dashboard"
        );
        coordinator.render(&filtered);

        RenderedDashboard {
            selection,
            summary: coordinator.summary().aggregates().clone(),
            summary_display: coordinator.summary().display(),
            chart: coordinator.chart().frame(),
            map: coordinator.map().frame(),
            chart_svg: coordinator.chart().to_svg(),
            map_svg: coordinator.map().to_svg(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::ridership::tests::record;
    use crate::domain::ridership::Choice;
    use crate::infrastructure::svg_chart::Phase;

    pub(crate) fn service() -> DashboardService {
        let mut placed = record("Mon", "A", 8, 10);
        placed.latitude = Some(40.75);
        placed.longitude = Some(-73.98);
        let dataset = Dataset::new(vec![placed, record("Mon", "B", 9, 4)]);

        DashboardService::new(Arc::new(dataset), DashboardConfig::default())
    }

    fn phases(rendered: &RenderedDashboard) -> Vec<(u32, Phase)> {
        rendered.chart.bars.iter().map(|b| (b.hour, b.phase)).collect()
    }

    #[test]
    fn test_render_all() {
        let rendered = service().render(FilterSelection::default(), None);
        assert_eq!(rendered.summary.total_trips, 14);
        assert_eq!(rendered.summary.active_routes, 2);
        assert_eq!(rendered.summary_display.average_trips, "7.0");
        assert_eq!(rendered.chart.bars.len(), 2);
        assert_eq!(rendered.map.markers.len(), 1);
        assert!(rendered.chart_svg.contains("<svg"));
    }

    #[test]
    fn test_render_joins_against_previous_selection() {
        let rendered = service().render(
            FilterSelection::new(Choice::All, Choice::parse("B")),
            Some(&FilterSelection::default()),
        );

        assert_eq!(phases(&rendered), vec![(9, Phase::Update)]);
        assert_eq!(rendered.chart.removed, vec![8]);
        assert!(rendered.map.markers.is_empty());
    }

    #[test]
    fn test_render_without_previous_selection_only_enters() {
        let service = service();
        service.render(
            FilterSelection::new(Choice::All, Choice::parse("B")),
            Some(&FilterSelection::default()),
        );
        let rendered = service.render(FilterSelection::default(), None);

        assert_eq!(phases(&rendered), vec![(8, Phase::Enter), (9, Phase::Enter)]);
        assert!(rendered.chart.removed.is_empty());
    }

    #[test]
    fn test_render_empty_selection() {
        let rendered = service().render(FilterSelection::new(Choice::parse("Tue"), Choice::All), None);
        assert_eq!(rendered.summary.total_trips, 0);
        assert_eq!(rendered.summary.average_trips, None);
        assert_eq!(rendered.summary_display.average_trips, "N/A");
        assert!(rendered.chart.bars.is_empty());
    }

    #[test]
    fn test_filter_options() {
        let options = service().filter_options();
        assert_eq!(options.days, vec!["All", "Mon"]);
        assert_eq!(options.routes, vec!["All", "A", "B"]);
    }
}

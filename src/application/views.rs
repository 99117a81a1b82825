// View capabilities driven by the render coordinator
use crate::domain::chart::{Bar, BandScale, LinearScale};
use crate::domain::map::Marker;
use crate::domain::summary::SummaryAggregates;

pub trait SummaryView: Send {
    fn show(&mut self, summary: &SummaryAggregates);
}

/// A chart that retains its bars between renders
pub trait ChartView: Send {
    fn draw_axes(&mut self, x: &BandScale<u32>, y: &LinearScale);

    /// Bring the drawn bars in line with `bars`, matched by hour
    fn reconcile(&mut self, bars: Vec<Bar>, x: &BandScale<u32>, y: &LinearScale);
}

pub trait MapView: Send {
    fn clear_markers(&mut self);

    fn draw_all(&mut self, markers: Vec<Marker>);
}

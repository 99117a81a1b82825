// SVG chart adapter - retains keyed bar marks and writes them as animated SVG
use crate::application::views::ChartView;
use crate::domain::chart::{Bar, BandScale, ChartLayout, DataJoin, Joined, LinearScale, Rect};
use crate::infrastructure::markup::{escape, px};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub bar_color: String,
    pub transition_ms: u64,
    pub tooltip_fade_in_ms: u64,
    pub tooltip_fade_out_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Enter,
    Update,
}

/// A drawn bar: where it animates from, where it settles, and its tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarMark {
    pub hour: u32,
    pub count: u64,
    pub phase: Phase,
    pub from: Rect,
    pub to: Rect,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    pub offset: f64,
    pub range: (f64, f64),
    pub ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub y_domain: (f64, f64),
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub bars: Vec<BarMark>,
    /// Hours whose bars were removed by the last render
    pub removed: Vec<u32>,
    pub style: ChartStyle,
}

pub struct SvgChartView {
    layout: ChartLayout,
    style: ChartStyle,
    x_axis: Axis,
    y_axis: Axis,
    y_domain: (f64, f64),
    marks: Vec<BarMark>,
    removed: Vec<u32>,
}

impl SvgChartView {
    pub fn new(layout: ChartLayout, style: ChartStyle) -> Self {
        Self {
            layout,
            style,
            x_axis: Axis::default(),
            y_axis: Axis::default(),
            y_domain: (0.0, 0.0),
            marks: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn frame(&self) -> ChartFrame {
        ChartFrame {
            width: self.layout.width,
            height: self.layout.height,
            y_domain: self.y_domain,
            x_axis: self.x_axis.clone(),
            y_axis: self.y_axis.clone(),
            bars: self.marks.clone(),
            removed: self.removed.clone(),
            style: self.style.clone(),
        }
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let (w, h) = (px(self.layout.width), px(self.layout.height));
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = write!(
            svg,
            "<style>.bar .tooltip{{opacity:0;pointer-events:none;transition:opacity {}ms}}\
             .bar:hover .tooltip{{opacity:1;transition:opacity {}ms}}</style>",
            self.style.tooltip_fade_out_ms, self.style.tooltip_fade_in_ms
        );
        self.write_x_axis(&mut svg);
        self.write_y_axis(&mut svg);
        for mark in &self.marks {
            self.write_bar(&mut svg, mark);
        }
        svg.push_str("</svg>");
        svg
    }

    fn write_x_axis(&self, svg: &mut String) {
        let axis = &self.x_axis;
        let _ = write!(
            svg,
            r#"<g class="x-axis" transform="translate(0,{})" font-size="10" text-anchor="middle"><path class="domain" stroke="currentColor" fill="none" d="M{},6V0H{}V6"/>"#,
            px(axis.offset),
            px(axis.range.0),
            px(axis.range.1)
        );
        for tick in &axis.ticks {
            let _ = write!(
                svg,
                r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="6"/><text fill="currentColor" y="9" dy="0.71em">{}</text></g>"#,
                px(tick.position),
                escape(&tick.label)
            );
        }
        svg.push_str("</g>");
    }

    fn write_y_axis(&self, svg: &mut String) {
        let axis = &self.y_axis;
        let _ = write!(
            svg,
            r#"<g class="y-axis" transform="translate({},0)" font-size="10" text-anchor="end"><path class="domain" stroke="currentColor" fill="none" d="M-6,{}H0V{}H-6"/>"#,
            px(axis.offset),
            px(axis.range.0),
            px(axis.range.1)
        );
        for tick in &axis.ticks {
            let _ = write!(
                svg,
                r#"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="-6"/><text fill="currentColor" x="-9" dy="0.32em">{}</text></g>"#,
                px(tick.position),
                escape(&tick.label)
            );
        }
        svg.push_str("</g>");
    }

    fn write_bar(&self, svg: &mut String, mark: &BarMark) {
        let to = mark.to;
        let _ = write!(
            svg,
            r#"<g class="bar" data-hour="{}"><rect x="{}" y="{}" width="{}" height="{}" fill="{}">"#,
            mark.hour,
            px(to.x),
            px(to.y),
            px(to.width),
            px(to.height),
            escape(&self.style.bar_color)
        );
        let attributes = [
            ("x", mark.from.x, to.x),
            ("y", mark.from.y, to.y),
            ("width", mark.from.width, to.width),
            ("height", mark.from.height, to.height),
        ];
        for (name, from, to) in attributes {
            if px(from) != px(to) {
                let _ = write!(
                    svg,
                    r#"<animate attributeName="{}" from="{}" to="{}" dur="{}ms" fill="freeze"/>"#,
                    name,
                    px(from),
                    px(to),
                    self.style.transition_ms
                );
            }
        }
        svg.push_str("</rect>");

        let (x, y) = (to.x + to.width / 2.0, (to.y - 8.0).max(28.0));
        let _ = write!(
            svg,
            r#"<g class="tooltip" transform="translate({},{})"><rect x="-40" y="-30" width="80" height="30" rx="4" fill="white" stroke="{}"/><text text-anchor="middle" font-size="11">"#,
            px(x),
            px(y),
            escape(&self.style.bar_color)
        );
        for (i, line) in mark.tooltip.lines().enumerate() {
            let _ = write!(
                svg,
                r#"<tspan x="0" y="{}">{}</tspan>"#,
                -18 + 13 * i as i32,
                escape(line)
            );
        }
        svg.push_str("</text></g></g>");
    }
}

impl ChartView for SvgChartView {
    fn draw_axes(&mut self, x: &BandScale<u32>, y: &LinearScale) {
        self.x_axis = Axis {
            offset: self.layout.baseline(),
            range: x.range(),
            ticks: x
                .domain()
                .iter()
                .filter_map(|hour| {
                    x.center(hour).map(|position| AxisTick {
                        position,
                        label: hour.to_string(),
                    })
                })
                .collect(),
        };

        let count = self.layout.ticks;
        self.y_domain = y.domain();
        self.y_axis = Axis {
            offset: self.layout.margin_left,
            range: y.range(),
            ticks: y
                .ticks(count)
                .into_iter()
                .map(|value| AxisTick {
                    position: y.scale(value),
                    label: y.tick_format(count, value),
                })
                .collect(),
        };
    }

    fn reconcile(&mut self, bars: Vec<Bar>, x: &BandScale<u32>, y: &LinearScale) {
        let next: Vec<BarMark> = bars
            .iter()
            .map(|bar| BarMark {
                hour: bar.hour,
                count: bar.count,
                phase: Phase::Enter,
                from: self.layout.entering_rect(bar, x, y),
                to: self.layout.bar_rect(bar, x, y),
                tooltip: bar.tooltip(),
            })
            .collect();

        let join = DataJoin::compute(&self.marks, &next, |mark| mark.hour);
        self.removed = join.exit.iter().map(|mark| mark.hour).collect();
        self.marks = join
            .entries
            .into_iter()
            .map(|entry| match entry {
                Joined::Enter(mark) => mark,
                Joined::Update { previous, current } => BarMark {
                    phase: Phase::Update,
                    from: previous.to,
                    ..current
                },
            })
            .collect();

        tracing::debug!(
            bars = self.marks.len(),
            removed = self.removed.len(),
            "reconciled chart bars"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SvgChartView {
        SvgChartView::new(
            ChartLayout::default(),
            ChartStyle {
                bar_color: "#4f46e5".to_string(),
                transition_ms: 800,
                tooltip_fade_in_ms: 100,
                tooltip_fade_out_ms: 300,
            },
        )
    }

    fn draw(view: &mut SvgChartView, bars: Vec<Bar>) {
        let layout = ChartLayout::default();
        let x = layout.x_scale(&bars);
        let y = layout.y_scale(&bars);
        view.draw_axes(&x, &y);
        view.reconcile(bars, &x, &y);
    }

    #[test]
    fn test_new_bars_grow_from_baseline() {
        let mut view = view();
        draw(&mut view, vec![Bar { hour: 8, count: 40 }]);

        let frame = view.frame();
        let mark = &frame.bars[0];
        assert_eq!(mark.phase, Phase::Enter);
        assert_eq!(mark.from.height, 0.0);
        assert_eq!(mark.from.y, 360.0);
        assert_eq!(mark.to.height, 340.0);
    }

    #[test]
    fn test_kept_bars_animate_from_previous_geometry() {
        let mut view = view();
        draw(&mut view, vec![Bar { hour: 8, count: 40 }, Bar { hour: 9, count: 20 }]);
        let before = view.frame().bars[1].to;

        draw(&mut view, vec![Bar { hour: 9, count: 10 }, Bar { hour: 10, count: 5 }]);
        let marks = view.frame().bars;
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].hour, 9);
        assert_eq!(marks[0].phase, Phase::Update);
        assert_eq!(marks[0].from, before);
        assert_eq!(marks[1].phase, Phase::Enter);
        assert_eq!(view.frame().removed, vec![8]);
    }

    #[test]
    fn test_repeated_hour_enters_in_same_band() {
        let mut view = view();
        draw(&mut view, vec![Bar { hour: 9, count: 5 }]);
        draw(&mut view, vec![Bar { hour: 8, count: 10 }, Bar { hour: 8, count: 30 }]);

        let frame = view.frame();
        assert_eq!(frame.y_domain, (0.0, 30.0));
        assert_eq!(frame.removed, vec![9]);
        let phases: Vec<(u32, u64, Phase)> =
            frame.bars.iter().map(|m| (m.hour, m.count, m.phase)).collect();
        assert_eq!(phases, vec![(8, 10, Phase::Enter), (8, 30, Phase::Enter)]);
        assert_eq!(frame.bars[0].to.x, frame.bars[1].to.x);
        assert_eq!(frame.bars[1].tooltip, "Hour: 8:00\nTrips: 30");
        assert_eq!(frame.x_axis.ticks.len(), 1);
    }

    #[test]
    fn test_redraw_with_same_bars_is_stable() {
        let bars = vec![Bar { hour: 8, count: 40 }, Bar { hour: 9, count: 20 }];
        let mut view = view();
        draw(&mut view, bars.clone());
        draw(&mut view, bars.clone());
        let first = view.to_svg();
        draw(&mut view, bars);

        assert!(view.frame().bars.iter().all(|m| m.from == m.to));
        assert_eq!(view.to_svg(), first);
        assert!(!first.contains("<animate"));
    }

    #[test]
    fn test_svg_contains_axes_bars_and_tooltips() {
        let mut view = view();
        draw(&mut view, vec![Bar { hour: 8, count: 40 }]);
        let svg = view.to_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"class="x-axis""#));
        assert!(svg.contains(r#"class="y-axis""#));
        assert!(svg.contains(r#"data-hour="8""#));
        assert!(svg.contains(r#"attributeName="height" from="0" to="340" dur="800ms""#));
        assert!(svg.contains("Hour: 8:00"));
        assert!(svg.contains("Trips: 40"));
        assert!(svg.contains("transition:opacity 100ms"));
    }

    #[test]
    fn test_axes_follow_scales() {
        let mut view = view();
        draw(&mut view, vec![Bar { hour: 17, count: 37 }, Bar { hour: 8, count: 5 }]);
        let frame = view.frame();

        let labels: Vec<&str> = frame.x_axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["17", "8"]);
        assert_eq!(frame.y_axis.ticks.last().map(|t| t.label.as_str()), Some("40"));
        assert_eq!(frame.y_axis.offset, 50.0);
        assert_eq!(frame.x_axis.offset, 360.0);
        assert_eq!(frame.y_domain, (0.0, 40.0));
    }
}

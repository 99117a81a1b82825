// Server-rendered dashboard page
use crate::application::dashboard_service::RenderedDashboard;
use crate::domain::ridership::{Choice, FilterOptions};
use crate::infrastructure::markup::escape;
use std::fmt::Write;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#1f2937}\
.controls{display:flex;gap:1rem;margin-bottom:1rem}\
.summary{display:flex;gap:2rem;margin-bottom:1rem}\
.summary div{font-size:.9rem}.summary span{display:block;font-size:1.6rem;font-weight:600}\
.views{display:flex;flex-wrap:wrap;gap:1.5rem}";

/// Link to the JSON rendering of a selection
pub fn api_link(day: &Choice, route: &Choice) -> String {
    format!(
        "/api/dashboard?day={}&route={}",
        urlencoding::encode(day.as_str()),
        urlencoding::encode(route.as_str())
    )
}

pub fn render_page(options: &FilterOptions, rendered: &RenderedDashboard) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Transit Ridership Dashboard</title><style>{}</style></head><body>\
         <h1>Transit Ridership</h1>",
        STYLE
    );

    // Both selectors submit together so every change carries the live value of each
    html.push_str(r#"<form class="controls" method="get" action="/">"#);
    write_select(&mut html, "day", "Day", &options.days, &rendered.selection.day);
    write_select(&mut html, "route", "Route", &options.routes, &rendered.selection.route);
    // The selection on screen, so the next render animates from it
    let _ = write!(
        html,
        r#"<input type="hidden" name="prev_day" value="{}"><input type="hidden" name="prev_route" value="{}">"#,
        escape(rendered.selection.day.as_str()),
        escape(rendered.selection.route.as_str())
    );
    html.push_str("<noscript><button type=\"submit\">Apply</button></noscript></form>");

    let summary = &rendered.summary_display;
    let _ = write!(
        html,
        r#"<section class="summary"><div>Total trips<span id="total-trips">{}</span></div><div>Average trips<span id="avg-trips">{}</span></div><div>Active routes<span id="route-count">{}</span></div></section>"#,
        escape(&summary.total_trips),
        escape(&summary.average_trips),
        escape(&summary.active_routes)
    );

    let _ = write!(
        html,
        r#"<section class="views"><div id="chart">{}</div><div id="map">{}</div></section>"#,
        rendered.chart_svg, rendered.map_svg
    );

    let _ = write!(
        html,
        r#"<p><a href="{}">JSON</a></p></body></html>"#,
        escape(&api_link(&rendered.selection.day, &rendered.selection.route))
    );
    html
}

fn write_select(html: &mut String, name: &str, label: &str, values: &[String], selected: &Choice) {
    let _ = write!(
        html,
        r#"<label>{label} <select id="{name}-select" name="{name}" onchange="this.form.submit()">"#
    );
    for value in values {
        let marker = if value == selected.as_str() { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape(value),
            marker
        );
    }
    html.push_str("</select></label>");
}

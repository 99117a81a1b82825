// SVG map adapter - tile layer plus a replaceable layer of circle markers
use crate::application::views::MapView;
use crate::domain::map::{MapViewport, Marker, Tile, TILE_SIZE};
use crate::infrastructure::markup::{escape, px};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub color: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedMarker {
    #[serde(flatten)]
    pub marker: Marker,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    pub viewport: MapViewport,
    pub tiles: Vec<Tile>,
    pub markers: Vec<PlacedMarker>,
    pub marker_style: MarkerStyle,
}

pub struct SvgMapView {
    viewport: MapViewport,
    tiles: Vec<Tile>,
    style: MarkerStyle,
    markers: Vec<PlacedMarker>,
}

impl SvgMapView {
    pub fn new(viewport: MapViewport, style: MarkerStyle) -> Self {
        // The view never pans, so the tile layer is fixed
        let tiles = viewport.tiles();
        Self {
            viewport,
            tiles,
            style,
            markers: Vec::new(),
        }
    }

    pub fn frame(&self) -> MapFrame {
        MapFrame {
            viewport: self.viewport.clone(),
            tiles: self.tiles.clone(),
            markers: self.markers.clone(),
            marker_style: self.style.clone(),
        }
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let (w, h) = (px(self.viewport.width), px(self.viewport.height));
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="map" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><g class="tiles">"#
        );
        for tile in &self.tiles {
            let _ = write!(
                svg,
                r#"<image href="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
                escape(&tile.url),
                px(tile.left),
                px(tile.top),
                TILE_SIZE,
                TILE_SIZE
            );
        }
        svg.push_str(r#"</g><g class="markers">"#);
        let color = escape(&self.style.color);
        for placed in &self.markers {
            let _ = write!(
                svg,
                r#"<circle class="marker" cx="{}" cy="{}" r="{}" stroke="{color}" stroke-width="3" fill="{color}" fill-opacity="{}"><title>{}</title></circle>"#,
                px(placed.x),
                px(placed.y),
                px(self.style.radius),
                self.style.fill_opacity,
                escape(&placed.marker.popup)
            );
        }
        svg.push_str("</g></svg>");
        svg
    }
}

impl MapView for SvgMapView {
    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn draw_all(&mut self, markers: Vec<Marker>) {
        for marker in markers {
            let (x, y) = self.viewport.to_screen(marker.latitude, marker.longitude);
            self.markers.push(PlacedMarker { marker, x, y });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SvgMapView {
        SvgMapView::new(
            MapViewport {
                center: (40.73, -73.93),
                zoom: 11,
                width: 600.0,
                height: 400.0,
                tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            },
            MarkerStyle {
                radius: 6.0,
                color: "#4f46e5".to_string(),
                fill_opacity: 0.6,
            },
        )
    }

    fn marker(popup: &str) -> Marker {
        Marker {
            latitude: 40.73,
            longitude: -73.93,
            popup: popup.to_string(),
        }
    }

    #[test]
    fn test_clear_then_draw_replaces_markers() {
        let mut view = view();
        view.draw_all(vec![marker("A"), marker("B")]);
        view.clear_markers();
        view.draw_all(vec![marker("C")]);

        let markers = view.frame().markers;
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].marker.popup, "C");
        assert!((markers[0].x - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_svg_has_tiles_and_escaped_popups() {
        let mut view = view();
        view.draw_all(vec![marker("<A>\nMon 8:00\nTrips: 10")]);
        let svg = view.to_svg();

        assert!(svg.contains("tile.openstreetmap.org/11/"));
        assert!(svg.contains(r#"class="marker""#));
        assert!(svg.contains("&lt;A&gt;"));
        assert!(svg.contains(r#"fill-opacity="0.6""#));
    }
}

// Map domain model - point markers and the Web-Mercator viewport
use super::ridership::Record;
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
/// Deepest zoom any public tile server offers
pub const MAX_ZOOM: u32 = 22;
const MAX_LATITUDE: f64 = 85.0511287798;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
}

impl Marker {
    /// `None` unless the record has both coordinates
    pub fn for_record(record: &Record) -> Option<Self> {
        let (latitude, longitude) = record.position()?;
        Some(Self {
            latitude,
            longitude,
            popup: format!(
                "{}\n{} {}:00\nTrips: {}",
                record.route, record.day, record.hour, record.count
            ),
        })
    }
}

pub fn markers_for(filtered: &[&Record]) -> Vec<Marker> {
    filtered.iter().filter_map(|r| Marker::for_record(r)).collect()
}

/// A single slippy-map tile placed in viewport pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub x: i64,
    pub y: i64,
    pub z: u32,
    pub left: f64,
    pub top: f64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapViewport {
    pub center: (f64, f64),
    pub zoom: u32,
    pub width: f64,
    pub height: f64,
    pub tile_url: String,
    pub subdomains: Vec<String>,
}

impl MapViewport {
    /// World pixel coordinates of a lat/lon at this zoom
    pub fn project(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let world = TILE_SIZE * 2f64.powi(self.zoom as i32);
        let lat = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (longitude + 180.0) / 360.0 * world;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * world;
        (x, y)
    }

    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = self.project(self.center.0, self.center.1);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }

    /// Viewport pixel coordinates of a lat/lon
    pub fn to_screen(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let (x, y) = self.project(latitude, longitude);
        let (ox, oy) = self.origin();
        (x - ox, y - oy)
    }

    /// Tiles covering the viewport; x wraps around the antimeridian, rows
    /// outside the world are skipped
    pub fn tiles(&self) -> Vec<Tile> {
        let (ox, oy) = self.origin();
        let count = 2i64.pow(self.zoom);
        let first_x = (ox / TILE_SIZE).floor() as i64;
        let last_x = ((ox + self.width) / TILE_SIZE).floor() as i64;
        let first_y = (oy / TILE_SIZE).floor() as i64;
        let last_y = ((oy + self.height) / TILE_SIZE).floor() as i64;

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            if ty < 0 || ty >= count {
                continue;
            }
            for tx in first_x..=last_x {
                let wrapped = tx.rem_euclid(count);
                tiles.push(Tile {
                    x: wrapped,
                    y: ty,
                    z: self.zoom,
                    left: tx as f64 * TILE_SIZE - ox,
                    top: ty as f64 * TILE_SIZE - oy,
                    url: self.tile_url_for(wrapped, ty),
                });
            }
        }
        tiles
    }

    fn tile_url_for(&self, x: i64, y: i64) -> String {
        let mut vars = HashMap::new();
        if !self.subdomains.is_empty() {
            let index = (x + y).unsigned_abs() as usize % self.subdomains.len();
            vars.insert("s".to_string(), self.subdomains[index].clone());
        }
        vars.insert("z".to_string(), self.zoom.to_string());
        vars.insert("x".to_string(), x.to_string());
        vars.insert("y".to_string(), y.to_string());
        expand_template(&self.tile_url, &vars)
    }
}

/// Replace `{name}` placeholders in a URL template
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ridership::tests::record;

    fn viewport() -> MapViewport {
        MapViewport {
            center: (40.73, -73.93),
            zoom: 11,
            width: 600.0,
            height: 400.0,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    }

    #[test]
    fn test_expand_template() {
        let mut vars = HashMap::new();
        vars.insert("s".to_string(), "b".to_string());
        vars.insert("z".to_string(), "11".to_string());
        vars.insert("x".to_string(), "603".to_string());
        vars.insert("y".to_string(), "769".to_string());

        let url = expand_template("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", &vars);
        assert_eq!(url, "https://b.tile.openstreetmap.org/11/603/769.png");
    }

    #[test]
    fn test_center_projects_to_viewport_middle() {
        let view = viewport();
        let (x, y) = view.to_screen(40.73, -73.93);
        assert!((x - 300.0).abs() < 1e-6);
        assert!((y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiles_cover_viewport() {
        let view = viewport();
        let tiles = view.tiles();
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.z == 11));
        assert!(tiles.iter().any(|t| t.left <= 0.0 && t.top <= 0.0));
        assert!(tiles
            .iter()
            .any(|t| t.left + TILE_SIZE >= 600.0 && t.top + TILE_SIZE >= 400.0));

        // Leaflet's subdomain rotation
        for t in &tiles {
            let s = ["a", "b", "c"][((t.x + t.y) % 3) as usize];
            assert!(t.url.starts_with(&format!("https://{}.tile", s)));
        }
    }

    #[test]
    fn test_tiles_wrap_at_low_zoom() {
        let mut view = viewport();
        view.zoom = 0;
        view.center = (0.0, 179.0);
        let tiles = view.tiles();
        assert!(tiles.iter().all(|t| t.x == 0 && t.y == 0));
        assert!(tiles.len() >= 2);
    }

    #[test]
    fn test_markers_skip_records_without_coordinates() {
        let mut placed = record("Mon", "A", 8, 10);
        placed.latitude = Some(40.75);
        placed.longitude = Some(-73.98);
        let unplaced = record("Mon", "B", 9, 4);

        let markers = markers_for(&[&placed, &unplaced]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].popup, "A\nMon 8:00\nTrips: 10");
    }
}

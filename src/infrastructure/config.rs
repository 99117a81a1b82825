// Dashboard configuration - optional config/dashboard file over serde defaults
use crate::domain::chart::ChartLayout;
use crate::domain::map::{MapViewport, MAX_ZOOM};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub chart: ChartSettings,
    pub map: MapSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataSettings {
    /// Local path or http(s) URL of the ridership CSV
    pub source: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: "data/transport_data.csv".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub padding: f64,
    pub ticks: usize,
    pub bar_color: String,
    pub transition_ms: u64,
    pub tooltip_fade_in_ms: u64,
    pub tooltip_fade_out_ms: u64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        let layout = ChartLayout::default();
        Self {
            width: layout.width,
            height: layout.height,
            margin_top: layout.margin_top,
            margin_right: layout.margin_right,
            margin_bottom: layout.margin_bottom,
            margin_left: layout.margin_left,
            padding: layout.padding,
            ticks: layout.ticks,
            bar_color: "#4f46e5".to_string(),
            transition_ms: 800,
            tooltip_fade_in_ms: 100,
            tooltip_fade_out_ms: 300,
        }
    }
}

impl ChartSettings {
    pub fn layout(&self) -> ChartLayout {
        ChartLayout {
            width: self.width,
            height: self.height,
            margin_top: self.margin_top,
            margin_right: self.margin_right,
            margin_bottom: self.margin_bottom,
            margin_left: self.margin_left,
            padding: self.padding,
            ticks: self.ticks,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u32,
    pub max_zoom: u32,
    pub width: f64,
    pub height: f64,
    pub tile_url: String,
    pub subdomains: Vec<String>,
    pub marker_radius: f64,
    pub marker_color: String,
    pub marker_fill_opacity: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            latitude: 40.73,
            longitude: -73.93,
            zoom: 11,
            max_zoom: 18,
            width: 600.0,
            height: 400.0,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            marker_radius: 6.0,
            marker_color: "#4f46e5".to_string(),
            marker_fill_opacity: 0.6,
        }
    }
}

impl MapSettings {
    pub fn viewport(&self) -> MapViewport {
        MapViewport {
            center: (self.latitude, self.longitude),
            zoom: self.zoom,
            width: self.width,
            height: self.height,
            tile_url: self.tile_url.clone(),
            subdomains: self.subdomains.clone(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.map.max_zoom <= MAX_ZOOM,
            "map max_zoom {} exceeds {}",
            self.map.max_zoom,
            MAX_ZOOM
        );
        anyhow::ensure!(
            self.map.zoom <= self.map.max_zoom,
            "map zoom {} exceeds max_zoom {}",
            self.map.zoom,
            self.map.max_zoom
        );
        anyhow::ensure!(
            self.chart.width > 0.0 && self.chart.height > 0.0,
            "chart size must be positive"
        );
        anyhow::ensure!(
            self.map.width > 0.0 && self.map.height > 0.0,
            "map size must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.chart.padding),
            "chart padding must be within [0, 1]"
        );
        Ok(())
    }
}

/// Read `config/dashboard.*` if present, falling back to defaults
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_dashboard_config_from("config/dashboard")
}

pub fn load_dashboard_config_from(name: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = load_dashboard_config_from("does/not/exist/dashboard").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.map.zoom, 11);
        assert_eq!(config.chart.transition_ms, 800);
        assert_eq!(config.chart.layout(), ChartLayout::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[data]\nsource = \"https://example.org/rides.csv\"\n\n[map]\nzoom = 13\n"
        )
        .unwrap();

        let name = dir.path().join("dashboard");
        let config = load_dashboard_config_from(name.to_str().unwrap()).unwrap();
        assert_eq!(config.data.source, "https://example.org/rides.csv");
        assert_eq!(config.map.zoom, 13);
        assert_eq!(config.map.max_zoom, 18);
    }

    #[test]
    fn test_zoom_above_max_is_rejected() {
        let mut config = DashboardConfig::default();
        config.map.zoom = 19;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_zoom_is_capped() {
        let mut config = DashboardConfig::default();
        config.map.max_zoom = 22;
        config.map.zoom = 22;
        assert!(config.validate().is_ok());

        config.map.max_zoom = 63;
        config.map.zoom = 63;
        assert!(config.validate().is_err());
    }
}

use std::env;

use annotations::{DEFAULT_ENDPOINT, DEFAULT_LIMIT, GatewayConfig, MIN_FETCH_ZOOM};
use layers::{BaseMap, DEFAULT_FIT_PADDING, TileTemplate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_JOSM_URL: &str = "http://localhost:8111";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, value: String },
    Json(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { var, value } => write!(f, "invalid {var}: {value:?}"),
            ConfigError::Json(msg) => write!(f, "invalid viewer config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything a viewer needs to know about the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub annotations_url: String,
    pub tile_template: TileTemplate,
    pub fetch_limit: u32,
    /// Fetches are skipped at or below this zoom.
    pub min_fetch_zoom: f64,
    pub fit_padding: u32,
    pub josm_url: String,
    pub base_map: BaseMap,
    /// `[lng, lat]`.
    pub initial_center: [f64; 2],
    pub initial_zoom: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            annotations_url: DEFAULT_ENDPOINT.to_string(),
            tile_template: TileTemplate::default(),
            fetch_limit: DEFAULT_LIMIT,
            min_fetch_zoom: MIN_FETCH_ZOOM,
            fit_padding: DEFAULT_FIT_PADDING,
            josm_url: DEFAULT_JOSM_URL.to_string(),
            base_map: BaseMap::default(),
            initial_center: [0.0, 0.0],
            initial_zoom: 2.0,
        }
    }
}

impl ViewerConfig {
    /// Defaults overlaid with `ALLMAPS_ANNOTATIONS_URL`,
    /// `ALLMAPS_TILE_TEMPLATE`, `ALLMAPS_FETCH_LIMIT`, `ALLMAPS_MIN_FETCH_ZOOM`
    /// and `JOSM_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("ALLMAPS_ANNOTATIONS_URL") {
            config.annotations_url = url;
        }
        if let Some(template) = lookup("ALLMAPS_TILE_TEMPLATE") {
            config.tile_template = TileTemplate::new(template);
        }
        if let Some(limit) = lookup("ALLMAPS_FETCH_LIMIT") {
            config.fetch_limit = parse_var("ALLMAPS_FETCH_LIMIT", limit)?;
        }
        if let Some(zoom) = lookup("ALLMAPS_MIN_FETCH_ZOOM") {
            config.min_fetch_zoom = parse_var("ALLMAPS_MIN_FETCH_ZOOM", zoom)?;
        }
        if let Some(url) = lookup("JOSM_URL") {
            config.josm_url = url;
        }
        Ok(config)
    }

    /// Partial JSON objects are filled from the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            min_zoom: self.min_fetch_zoom,
            limit: self.fetch_limit,
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

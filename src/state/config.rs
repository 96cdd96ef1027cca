use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error_handling::GraphError;
use crate::graph::colors::{Palette, DEFAULT_PALETTE, MIN_PALETTE_LEN};
use crate::graph::edges::RouteHint;
use crate::graph::positions::LayoutMetrics;
use crate::graph::view_model::LayoutMode;

const CONFIG_DIR_NAME: &str = "commit-graph";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub layout_mode: LayoutMode,
    pub palette: Vec<String>, // hex colors
    pub row_height: f32,
    pub column_width: f32,
    pub base_offset: f32,
    pub edge_style: RouteHint,
    /// Commits loaded from a repository per build.
    pub commit_limit: usize,
    pub include_remotes: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let metrics = LayoutMetrics::default();
        Self {
            layout_mode: LayoutMode::default(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            row_height: metrics.row_height,
            column_width: metrics.column_width,
            base_offset: metrics.base_offset,
            edge_style: RouteHint::default(),
            commit_limit: 200,
            include_remotes: true,
        }
    }
}

impl LayoutConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => warn!("Ignoring config at {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("Loaded layout config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(config_path) = Self::default_path() {
            self.save_to(&config_path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if self.palette.len() < MIN_PALETTE_LEN {
            return Err(GraphError::configuration(
                "palette",
                format!("needs at least {} colours, got {}", MIN_PALETTE_LEN, self.palette.len()),
            ));
        }

        let hex = Regex::new(r"^#[0-9a-fA-F]{6}$")?;
        if let Some(bad) = self.palette.iter().find(|c| !hex.is_match(c)) {
            return Err(GraphError::configuration("palette", format!("'{}' is not a #rrggbb colour", bad)));
        }

        for (setting, value) in [
            ("row_height", self.row_height),
            ("column_width", self.column_width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GraphError::configuration(setting, "must be a positive number"));
            }
        }
        if !(self.base_offset.is_finite() && self.base_offset >= 0.0) {
            return Err(GraphError::configuration("base_offset", "must not be negative"));
        }
        if self.commit_limit == 0 {
            return Err(GraphError::configuration("commit_limit", "must be at least 1"));
        }
        Ok(())
    }

    pub fn palette(&self) -> Result<Palette, GraphError> {
        Palette::from_hex_list(&self.palette)
    }

    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics {
            row_height: self.row_height,
            column_width: self.column_width,
            base_offset: self.base_offset,
        }
    }
}

use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap().join(".imdock.toml") }

/// Metrics driving slot hit-testing, tab chrome, and layout minimums.
/// All values are in screen units (pixels for most hosts).
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct DockSettings {
    /// Half-extent of a slot hot-box; the box is `2 * extent` on each side.
    #[serde(default = "default_slot_box_extent")]
    pub slot_box_extent: f32,
    /// Distance from the target panel's center to the near edge of a
    /// directional hot-box.
    #[serde(default = "default_slot_box_offset")]
    pub slot_box_offset: f32,
    /// Inset of border hot-boxes from the display edge.
    #[serde(default = "default_border_inset")]
    pub border_inset: f32,
    /// Pointer travel (from press) required before a tab drag starts.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,
    #[serde(default = "default_splitter_thickness")]
    pub splitter_thickness: f32,
    /// Minimum edge length of a leaf panel, before the tab-bar line height
    /// is added vertically.
    #[serde(default = "default_min_panel_edge")]
    pub min_panel_edge: f32,
    /// Tab-bar height, in text line heights.
    #[serde(default = "default_tab_bar_lines")]
    pub tab_bar_lines: f32,
    /// Horizontal spacing between adjacent tabs.
    #[serde(default = "default_tab_spacing")]
    pub tab_spacing: f32,
}

fn default_slot_box_extent() -> f32 { 20.0 }
fn default_slot_box_offset() -> f32 { 30.0 }
fn default_border_inset() -> f32 { 10.0 }
fn default_drag_threshold() -> f32 { 6.0 }
fn default_splitter_thickness() -> f32 { 3.0 }
fn default_min_panel_edge() -> f32 { 16.0 }
fn default_tab_bar_lines() -> f32 { 2.0 }
fn default_tab_spacing() -> f32 { 15.0 }

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            slot_box_extent: default_slot_box_extent(),
            slot_box_offset: default_slot_box_offset(),
            border_inset: default_border_inset(),
            drag_threshold: default_drag_threshold(),
            splitter_thickness: default_splitter_thickness(),
            min_panel_edge: default_min_panel_edge(),
            tab_bar_lines: default_tab_bar_lines(),
            tab_spacing: default_tab_spacing(),
        }
    }
}

impl DockSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.slot_box_extent <= 0.0 {
            issues.push("slot_box_extent must be positive".to_string());
        }
        if self.slot_box_offset < self.slot_box_extent {
            issues.push(format!(
                "slot_box_offset ({}) smaller than slot_box_extent ({}); directional hot-boxes would overlap the center tab box",
                self.slot_box_offset, self.slot_box_extent
            ));
        }
        if self.border_inset < 0.0 {
            issues.push("border_inset must not be negative".to_string());
        }
        if self.drag_threshold <= 0.0 {
            issues.push("drag_threshold must be positive".to_string());
        }
        if self.splitter_thickness <= 0.0 {
            issues.push("splitter_thickness must be positive".to_string());
        }
        if self.min_panel_edge <= 0.0 {
            issues.push("min_panel_edge must be positive".to_string());
        }
        if self.tab_bar_lines < 1.0 {
            issues.push("tab_bar_lines must be at least 1".to_string());
        }

        issues
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: DockSettings = toml::from_str(&text)?;
        let issues = settings.validate();
        if !issues.is_empty() {
            bail!("invalid dock settings in {}:\n{}", path.display(), issues.join("\n"));
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DockSettings::default().validate(), Vec::<String>::new());
    }

    #[test]
    fn overlapping_slot_boxes_are_rejected() {
        let settings = DockSettings {
            slot_box_offset: 5.0,
            ..DockSettings::default()
        };
        let issues = settings.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("slot_box_offset"));
    }

    #[test]
    fn load_applies_field_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "drag_threshold = 10.0").unwrap();
        let settings = DockSettings::load(file.path()).unwrap();
        assert_eq!(settings.drag_threshold, 10.0);
        assert_eq!(settings.slot_box_extent, default_slot_box_extent());
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_gap = 4.0").unwrap();
        assert!(DockSettings::load(file.path()).is_err());
    }
}

use crate::ir::LayoutDirection;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigateSettings {
    pub use_navigate: bool,
}

impl Default for NavigateSettings {
    fn default() -> Self {
        Self { use_navigate: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSettings {
    pub create_float: bool,
    /// Distance between a parent's far side and its children.
    pub horizontal_gap: f32,
    pub floating_gap_x: f32,
    pub floating_gap_y: f32,
    pub standalone_width: f32,
    pub standalone_height: f32,
}

impl Default for CreateSettings {
    fn default() -> Self {
        Self {
            create_float: true,
            horizontal_gap: 200.0,
            floating_gap_x: 50.0,
            floating_gap_y: 100.0,
            standalone_width: 400.0,
            standalone_height: 500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    pub direction: LayoutDirection,
    /// Re-stack the remaining siblings after a node is deleted.
    pub auto_layout: bool,
    pub sibling_gap: f32,
    /// Maximum child-axis drift for nodes to count as one sibling rank.
    pub rank_tolerance: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::LeftRight,
            auto_layout: true,
            sibling_gap: 20.0,
            rank_tolerance: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitSettings {
    pub heading_level: u8,
    /// Generated heading nodes are this fraction of the parent's height.
    pub height_scale: f32,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            heading_level: 1,
            height_scale: 0.6,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub navigate: NavigateSettings,
    pub create: CreateSettings,
    pub layout: LayoutSettings,
    pub split: SplitSettings,
}

/// Loads settings from a JSON or JSON5 file, falling back to defaults for
/// anything the file leaves out.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_settings(&contents)
}

pub fn parse_settings(contents: &str) -> anyhow::Result<Settings> {
    if let Ok(settings) = serde_json::from_str::<Settings>(contents) {
        return Ok(settings);
    }
    let settings = json5::from_str::<Settings>(contents)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plugin_behaviour() {
        let settings = Settings::default();
        assert_eq!(settings.layout.direction, LayoutDirection::LeftRight);
        assert_eq!(settings.layout.sibling_gap, 20.0);
        assert_eq!(settings.create.horizontal_gap, 200.0);
        assert_eq!(settings.split.height_scale, 0.6);
        assert!(settings.navigate.use_navigate);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            parse_settings(r#"{"layout": {"direction": "TB", "siblingGap": 32}}"#).unwrap();
        assert_eq!(settings.layout.direction, LayoutDirection::TopBottom);
        assert_eq!(settings.layout.sibling_gap, 32.0);
        assert!(settings.layout.auto_layout);
        assert_eq!(settings.create.floating_gap_y, 100.0);
    }

    #[test]
    fn accepts_json5() {
        let settings = parse_settings(
            "{\n  // keep floating nodes off\n  create: { createFloat: false },\n  split: { headingLevel: 2, },\n}",
        )
        .unwrap();
        assert!(!settings.create.create_float);
        assert_eq!(settings.split.heading_level, 2);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_settings("layout = LR").is_err());
    }
}

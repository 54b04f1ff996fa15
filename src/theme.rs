use serde::{Deserialize, Serialize};

/// Canvas colour presets "1" through "6".
const CANVAS_PRESETS: [&str; 6] = [
    "#FB464C", "#E9973F", "#E0DE71", "#44CF6E", "#53DFDD", "#A882FF",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub node_fill: String,
    pub node_text_color: String,
    pub node_border_color: String,
    pub line_color: String,
    pub group_background: String,
    pub group_border: String,
    pub background: String,
    pub padding: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "#FFFFFF".to_string(),
            node_text_color: "#1C2430".to_string(),
            node_border_color: "#C7D2E5".to_string(),
            line_color: "#7A8AA6".to_string(),
            group_background: "#F7FAFF".to_string(),
            group_border: "#D7E0F0".to_string(),
            background: "#FFFFFF".to_string(),
            padding: 40.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "#262626".to_string(),
            node_text_color: "#DADADA".to_string(),
            node_border_color: "#555555".to_string(),
            line_color: "#8A8A8A".to_string(),
            group_background: "#1E1E1E".to_string(),
            group_border: "#444444".to_string(),
            background: "#1A1A1A".to_string(),
            padding: 40.0,
        }
    }

    /// Resolves a canvas colour (preset number or hex) to a CSS colour.
    pub fn resolve_color(&self, color: Option<&str>) -> Option<String> {
        let color = color?.trim();
        if let Ok(preset) = color.parse::<usize>() {
            return CANVAS_PRESETS
                .get(preset.checked_sub(1)?)
                .map(|hex| hex.to_string());
        }
        is_hex_color(color).then(|| color.to_string())
    }
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_presets_and_hex() {
        let theme = Theme::light();
        assert_eq!(theme.resolve_color(Some("4")).as_deref(), Some("#44CF6E"));
        assert_eq!(theme.resolve_color(Some("#123456")).as_deref(), Some("#123456"));
        assert_eq!(theme.resolve_color(Some("0")), None);
        assert_eq!(theme.resolve_color(Some("9")), None);
        assert_eq!(theme.resolve_color(None), None);
    }

    #[test]
    fn rejects_malformed_hex() {
        let theme = Theme::dark();
        assert_eq!(theme.resolve_color(Some("#abc")).as_deref(), Some("#abc"));
        assert_eq!(theme.resolve_color(Some("#12345678")).as_deref(), Some("#12345678"));
        assert_eq!(theme.resolve_color(Some("#12345")), None);
        assert_eq!(theme.resolve_color(Some("#zzzzzz")), None);
        assert_eq!(theme.resolve_color(Some("#\" onload=\"x")), None);
        assert_eq!(theme.resolve_color(Some("#")), None);
    }
}

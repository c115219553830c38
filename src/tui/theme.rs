//! Color themes for the questionnaire TUI.

use ratatui::style::Color;

/// Colors used by the questionnaire screens.
///
/// Selected by name through `ui.theme` in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as used in configuration
    pub name: String,
    /// Titles, focused borders, the submit button
    pub primary: Color,
    /// Question numbers and the team selector
    pub accent: Color,
    /// Answer text
    pub text: Color,
    /// Question labels
    pub label: Color,
    /// Placeholders and key hints
    pub text_muted: Color,
    /// Background (Reset uses terminal default)
    pub background: Color,
    /// Background of the focused field
    pub focus_bg: Color,
    /// Unfocused borders
    pub border: Color,
    /// Success dialog
    pub success: Color,
    /// Validation notices and the reset confirmation
    pub warning: Color,
    /// Failed submissions
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Default theme - works on both light and dark terminals.
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            primary: Color::Rgb(99, 102, 241),     // Indigo
            accent: Color::Rgb(251, 146, 60),      // Orange
            text: Color::White,
            label: Color::Rgb(156, 163, 175),      // Gray-400
            text_muted: Color::Rgb(107, 114, 128), // Gray-500
            background: Color::Reset,
            focus_bg: Color::Rgb(55, 65, 81),      // Gray-700
            border: Color::Rgb(75, 85, 99),        // Gray-600
            success: Color::Rgb(34, 197, 94),      // Green
            warning: Color::Rgb(234, 179, 8),      // Yellow
            error: Color::Rgb(239, 68, 68),        // Red
        }
    }

    /// Dracula theme - dark purple and pink.
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            primary: Color::Rgb(189, 147, 249),   // Purple
            accent: Color::Rgb(255, 121, 198),    // Pink
            text: Color::Rgb(248, 248, 242),      // Foreground
            label: Color::Rgb(139, 233, 253),     // Cyan
            text_muted: Color::Rgb(98, 114, 164), // Comment
            background: Color::Rgb(40, 42, 54),   // Background
            focus_bg: Color::Rgb(68, 71, 90),     // Current Line
            border: Color::Rgb(68, 71, 90),       // Selection
            success: Color::Rgb(80, 250, 123),    // Green
            warning: Color::Rgb(255, 184, 108),   // Orange
            error: Color::Rgb(255, 85, 85),       // Red
        }
    }

    /// Nord theme - arctic, bluish colors.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            primary: Color::Rgb(136, 192, 208),   // Frost
            accent: Color::Rgb(208, 135, 112),    // Aurora Orange
            text: Color::Rgb(236, 239, 244),      // Snow Storm
            label: Color::Rgb(216, 222, 233),
            text_muted: Color::Rgb(76, 86, 106),  // Polar Night
            background: Color::Rgb(46, 52, 64),
            focus_bg: Color::Rgb(59, 66, 82),
            border: Color::Rgb(67, 76, 94),
            success: Color::Rgb(163, 190, 140),   // Aurora Green
            warning: Color::Rgb(235, 203, 139),   // Aurora Yellow
            error: Color::Rgb(191, 97, 106),      // Aurora Red
        }
    }

    /// Get a theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_theme()),
            "dracula" => Some(Self::dracula()),
            "nord" => Some(Self::nord()),
            _ => None,
        }
    }

    /// Resolve a configured theme name, using the default for unknown names.
    pub fn from_config(name: &str) -> Self {
        Self::by_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using default", name);
            Self::default_theme()
        })
    }

    /// List all available built-in theme names.
    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "dracula", "nord"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_by_name() {
        assert!(Theme::by_name("dracula").is_some());
        assert!(Theme::by_name("NORD").is_some());
        assert!(Theme::by_name("solarized").is_none());
    }

    #[test]
    fn test_from_config_falls_back() {
        assert_eq!(Theme::from_config("nord").name, "nord");
        assert_eq!(Theme::from_config("unknown").name, "default");
    }

    #[test]
    fn test_all_builtin_themes_resolve() {
        for name in Theme::available_themes() {
            assert_eq!(Theme::by_name(name).map(|t| t.name), Some(name.to_string()));
        }
    }
}

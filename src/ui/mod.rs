//! UI rendering module for Airwatch
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod chart_view;
pub mod dashboard;
pub mod help_overlay;

pub use dashboard::render as render_dashboard;
pub use help_overlay::render as render_help_overlay;

/// Color scheme shared by the dashboard screens
pub mod colors {
    use ratatui::style::Color;

    use crate::data::AqiCategory;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Missing values and hints
    pub const MUTED: Color = Color::DarkGray;
    /// Error banner
    pub const ERROR: Color = Color::Red;

    /// Color for an AQI severity band
    pub fn category_color(category: AqiCategory) -> Color {
        match category {
            AqiCategory::Good => Color::Green,
            AqiCategory::Moderate => Color::Yellow,
            AqiCategory::UnhealthyForSensitiveGroups => Color::Rgb(255, 165, 0),
            AqiCategory::Unhealthy => Color::Red,
            AqiCategory::VeryUnhealthy => Color::Magenta,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_category_colors_distinct() {
            let categories = [
                AqiCategory::Good,
                AqiCategory::Moderate,
                AqiCategory::UnhealthyForSensitiveGroups,
                AqiCategory::Unhealthy,
                AqiCategory::VeryUnhealthy,
            ];

            for (i, a) in categories.iter().enumerate() {
                for (j, b) in categories.iter().enumerate() {
                    if i != j {
                        assert_ne!(category_color(*a), category_color(*b));
                    }
                }
            }
        }

        #[test]
        fn test_category_color_follows_aqi_table() {
            assert_eq!(category_color(AqiCategory::from_aqi(50.0)), Color::Green);
            assert_eq!(category_color(AqiCategory::from_aqi(51.0)), Color::Yellow);
            assert_eq!(category_color(AqiCategory::from_aqi(201.0)), Color::Magenta);
        }
    }
}

//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::stats::Health;

use super::panels::TextClass;

/// Dashboard palette. Only three colors carry meaning: green for healthy,
/// red for unhealthy and the gauge accent.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    pub const HEADER_BG: Color = Color::Blue;
    pub const HEADER_FG: Color = Color::White;

    pub const HEALTHY: Color = Color::Green;
    pub const UNHEALTHY: Color = Color::Red;

    pub const GAUGE_ACCENT: Color = Color::Cyan;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label() -> Style {
        Self::default().add_modifier(Modifier::BOLD)
    }

    pub fn healthy() -> Style {
        Style::default().fg(Theme::HEALTHY)
    }

    pub fn unhealthy() -> Style {
        Style::default()
            .fg(Theme::UNHEALTHY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Filled part of an in-sync gauge.
    pub fn gauge() -> Style {
        Style::default().fg(Theme::GAUGE_ACCENT).bg(Theme::BG)
    }

    /// Title of an in-sync gauge box.
    pub fn gauge_title() -> Style {
        Style::default()
            .fg(Theme::HEALTHY)
            .add_modifier(Modifier::BOLD)
    }

    /// Footer key legend.
    pub fn help() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Highlighted key in the footer legend.
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    pub fn from_health(health: Health) -> Style {
        match health {
            Health::Healthy => Self::healthy(),
            Health::Unhealthy => Self::unhealthy(),
            Health::Neutral => Self::default(),
        }
    }

    /// Maps a UI-agnostic [`TextClass`] to a ratatui [`Style`].
    pub fn from_class(class: TextClass) -> Style {
        match class {
            TextClass::Plain => Self::default(),
            TextClass::Label => Self::label(),
            TextClass::State(h) => Self::from_health(h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_colors() {
        assert_eq!(Styles::from_class(TextClass::State(Health::Healthy)).fg, Some(Color::Green));
        assert_eq!(Styles::from_class(TextClass::State(Health::Unhealthy)).fg, Some(Color::Red));
        assert_eq!(Styles::from_class(TextClass::Plain), Styles::default());
        assert!(
            Styles::from_class(TextClass::Label)
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }
}

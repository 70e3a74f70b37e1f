//! Theme and style system for rolodex.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the application
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Main accent color (borders, titles, key UI elements)
    pub primary: Color,
    /// Error states (failed fetches)
    pub error: Color,
    /// Main text color
    pub text: Color,
    /// Muted/secondary text
    pub text_muted: Color,
    /// Default border color
    pub border: Color,
    /// Focused border color
    pub border_focused: Color,
    /// Selection highlight background
    pub highlight_bg: Color,
    /// Background color (Reset inherits the terminal default)
    pub background: Color,
}

/// Get the current theme
pub fn theme() -> Theme {
    Theme::dark()
}

impl Theme {
    /// Dark theme - for dark terminal backgrounds
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            error: Color::Red,
            text: Color::White,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight_bg: Color::DarkGray,
            background: Color::Reset,
        }
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn header_row_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::UNDERLINED)
    }
}

/// Border style for the focused pane
pub fn focused_border_style() -> Style {
    Style::default().fg(theme().border_focused)
}

/// Border style for unfocused panes
pub fn unfocused_border_style() -> Style {
    Style::default().fg(theme().border)
}

//! Toast notification widget.
//!
//! A non-blocking notification that appears in the corner of the screen and
//! auto-closes after a fixed duration. This is the sink behind the
//! controller's [`Notifier`] capability: fetch failures land here instead of
//! interrupting the list.

use crate::controller::Notifier;
use crate::styles::theme;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use std::time::{Duration, Instant};

/// Toast notification variant for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Info,
    Error,
}

impl ToastVariant {
    fn icon(self) -> &'static str {
        match self {
            ToastVariant::Info => "\u{2139}",  // ℹ
            ToastVariant::Error => "\u{2718}", // ✘
        }
    }

    fn color(self) -> ratatui::style::Color {
        let t = theme();
        match self {
            ToastVariant::Info => t.primary,
            ToastVariant::Error => t.error,
        }
    }
}

/// Toast notification data
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub variant: ToastVariant,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, variant: ToastVariant) -> Self {
        Self {
            message: message.into(),
            variant,
            created_at: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastVariant::Error)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Holds the current toast (only one at a time; a new toast replaces the
/// previous one).
#[derive(Debug, Default)]
pub struct ToastManager {
    current: Option<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn push(&mut self, toast: Toast) {
        self.current = Some(toast);
    }

    /// Drop the toast once it has expired.
    pub fn tick(&mut self) {
        if self.current.as_ref().is_some_and(Toast::is_expired) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Render the current toast (if any) in the bottom-right corner.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(toast) = self.current() else {
            return;
        };

        let width = 44u16.min(area.width.saturating_sub(4));
        let height = 3u16;
        let x = area.x + area.width.saturating_sub(width + 2);
        let y = area.y + area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, toast_area);

        let t = theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(toast.variant.color()))
            .style(Style::default().bg(t.background));
        let paragraph = Paragraph::new(format!(" {} {} ", toast.variant.icon(), toast.message))
            .block(block)
            .style(Style::default().fg(t.text).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, toast_area);
    }
}

impl Notifier for ToastManager {
    fn notify(&mut self, message: &str) {
        self.push(Toast::error(message));
    }
}

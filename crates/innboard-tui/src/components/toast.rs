//! Toast notifications stacked above the status bar
//!
//! Toasts expire on their own after a few seconds. Core publishes
//! [`Notice`] events for data outcomes and the shell converts them
//! into toasts; views never render toasts themselves.

use std::time::{Duration, Instant};

use innboard_core::{Notice, NoticeLevel};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const TOAST_DURATION: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 5;
const TOAST_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Warning,
    Error,
    Info,
}

impl ToastType {
    pub fn color(&self) -> Color {
        match self {
            ToastType::Success => Color::Green,
            ToastType::Warning => Color::Yellow,
            ToastType::Error => Color::Red,
            ToastType::Info => Color::Cyan,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToastType::Success => "✓",
            ToastType::Warning => "⚠",
            ToastType::Error => "✗",
            ToastType::Info => "ℹ",
        }
    }
}

pub struct Toast {
    pub message: String,
    pub toast_type: ToastType,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= TOAST_DURATION
    }
}

impl From<Notice> for Toast {
    fn from(notice: Notice) -> Self {
        let toast_type = match notice.level {
            NoticeLevel::Success => ToastType::Success,
            NoticeLevel::Warning => ToastType::Warning,
            NoticeLevel::Error => ToastType::Error,
        };
        Toast::new(notice.message, toast_type)
    }
}

#[derive(Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastType::Success));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastType::Warning));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastType::Error));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastType::Info));
    }

    pub fn clear_expired(&mut self) {
        self.toasts.retain(|toast| !toast.is_expired());
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Draws the newest toasts bottom-up, centered horizontally
    pub fn render(&self, f: &mut Frame) {
        let area = f.area();
        for (index, toast) in self.toasts.iter().rev().take(MAX_VISIBLE).enumerate() {
            let width = (toast.message.chars().count() as u16 + 6).min(area.width);
            let x = area.width.saturating_sub(width) / 2;
            let y = area
                .height
                .saturating_sub((index as u16 + 1) * TOAST_HEIGHT + 1);
            let rect = Rect::new(x, y, width, TOAST_HEIGHT);

            let color = toast.toast_type.color();
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", toast.toast_type.icon()),
                    Style::default().fg(color),
                ),
                Span::raw(toast.message.clone()),
            ]);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color));

            f.render_widget(Clear, rect);
            f.render_widget(Paragraph::new(line).block(block), rect);
        }
    }
}

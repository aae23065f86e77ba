//! Modal yes/no dialog used before destructive actions

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
}

pub struct ConfirmDialog {
    pub visible: bool,
    title: String,
    message: String,
    default_choice: ConfirmChoice,
    palette: Palette,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            title: String::new(),
            message: String::new(),
            default_choice: ConfirmChoice::No,
            palette: Palette::new(),
        }
    }

    pub fn open(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = message.into();
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Returns `Some` when the key settles the dialog, closing it
    pub fn handle_key(&mut self, code: KeyCode) -> Option<ConfirmChoice> {
        if !self.visible {
            return None;
        }
        let choice = match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(ConfirmChoice::Yes),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(ConfirmChoice::No),
            KeyCode::Enter => Some(self.default_choice),
            _ => None,
        };
        if choice.is_some() {
            self.visible = false;
        }
        choice
    }

    pub fn render(&self, f: &mut Frame) {
        if !self.visible {
            return;
        }
        let area = f.area();
        let width = (area.width / 2).max(30).min(area.width);
        let height = 10u16.min(area.height);
        let rect = Rect::new(
            area.width.saturating_sub(width) / 2,
            area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.warning))
            .title(format!(" {} ", self.title));

        let lines = vec![
            Line::from(""),
            Line::from(self.message.clone()),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[y] ",
                    Style::default()
                        .fg(self.palette.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("yes   "),
                Span::styled(
                    "[n] ",
                    Style::default()
                        .fg(self.palette.success)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("no   "),
                Span::styled("[Esc] ", Style::default().fg(self.palette.muted)),
                Span::styled("cancel", Style::default().fg(self.palette.muted)),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(Clear, rect);
        f.render_widget(paragraph, rect);
    }
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_makes_dialog_visible() {
        let mut dialog = ConfirmDialog::new();
        assert!(!dialog.visible);
        dialog.open("Delete room", "Delete room 101?");
        assert!(dialog.visible);
        assert_eq!(dialog.title, "Delete room");
    }

    #[test]
    fn test_yes_and_no_settle_and_close() {
        let mut dialog = ConfirmDialog::new();
        dialog.open("Delete", "sure?");
        assert_eq!(dialog.handle_key(KeyCode::Char('y')), Some(ConfirmChoice::Yes));
        assert!(!dialog.visible);

        dialog.open("Delete", "sure?");
        assert_eq!(dialog.handle_key(KeyCode::Char('n')), Some(ConfirmChoice::No));
        assert!(!dialog.visible);
    }

    #[test]
    fn test_escape_counts_as_no() {
        let mut dialog = ConfirmDialog::new();
        dialog.open("Delete", "sure?");
        assert_eq!(dialog.handle_key(KeyCode::Esc), Some(ConfirmChoice::No));
    }

    #[test]
    fn test_enter_uses_safe_default() {
        let mut dialog = ConfirmDialog::new();
        dialog.open("Delete", "sure?");
        assert_eq!(dialog.handle_key(KeyCode::Enter), Some(ConfirmChoice::No));
    }

    #[test]
    fn test_hidden_dialog_ignores_keys() {
        let mut dialog = ConfirmDialog::new();
        assert_eq!(dialog.handle_key(KeyCode::Char('y')), None);
        dialog.open("Delete", "sure?");
        assert_eq!(dialog.handle_key(KeyCode::Char('z')), None);
        assert!(dialog.visible);
    }
}

//! Form field rendering and the text-editing primitive behind it
//!
//! Every modal form in the app is a stack of labelled lines. A field
//! knows whether it holds focus, whether it is a free-text input or a
//! left/right selector, and renders its validation error underneath.

use crossterm::event::KeyCode;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const LABEL_WIDTH: usize = 16;

/// One labelled line inside a form
pub struct FormField<'a> {
    label: &'a str,
    value: &'a str,
    focused: bool,
    masked: bool,
    selector: bool,
    cursor: bool,
    placeholder: &'a str,
    error: Option<&'a str>,
}

impl<'a> FormField<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
            masked: false,
            selector: false,
            cursor: true,
            placeholder: "",
            error: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Renders the value as bullets, for passwords
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Marks the field as a left/right choice instead of free text
    pub fn selector(mut self) -> Self {
        self.selector = true;
        self
    }

    /// Keeps the focused label style but hides the blinking cursor,
    /// for fields that are picked without being edited yet
    pub fn cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Builds the field line plus an error line when validation failed
    pub fn lines(&self) -> Vec<Line<'static>> {
        let label_style = if self.focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut spans = vec![Span::styled(
            format!("  {:<width$}", self.label, width = LABEL_WIDTH),
            label_style,
        )];

        let display = if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.to_string()
        };

        if display.is_empty() && !self.placeholder.is_empty() && !self.selector {
            spans.push(Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        } else if self.selector {
            let arrows = if self.focused {
                format!("◂ {display} ▸")
            } else {
                display
            };
            let style = if self.focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(arrows, style));
        } else {
            spans.push(Span::styled(display, Style::default().fg(Color::White)));
        }

        if self.focused && self.cursor && !self.selector {
            spans.push(Span::styled(
                "_",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let mut lines = vec![Line::from(spans)];
        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(
                format!("  {:<width$}✗ {error}", "", width = LABEL_WIDTH),
                Style::default().fg(Color::Red),
            )));
        }
        lines
    }
}

/// Applies a key to a text buffer. Returns true when the buffer changed.
pub fn edit_string(buffer: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            buffer.push(c);
            true
        }
        KeyCode::Backspace => buffer.pop().is_some(),
        _ => false,
    }
}

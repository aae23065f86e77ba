//! Add-property view: a full-page form
//!
//! # Features
//! - Every property field on one page, validated on submit
//! - Field errors rendered inline, submit failures in the banner
//!
//! # Keybindings
//! - `↑`/`k`, `↓`/`j`: pick a field
//! - `Enter`/`i`: edit the picked field
//! - `s`: submit, `c`: clear the form
//! - `x`: dismiss the error banner
//!
//! While editing: type into the field, `Tab`/`↓` next field,
//! `Shift+Tab`/`↑` previous, `Enter`/`Esc` stop editing.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::components::{edit_string, FormField, Spinner};
use crate::pages::{cycled, render_error_banner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyField {
    Name,
    Description,
    Street,
    City,
    State,
    ZipCode,
    Country,
    Email,
    Website,
}

impl PropertyField {
    fn all() -> &'static [PropertyField] {
        &[
            PropertyField::Name,
            PropertyField::Description,
            PropertyField::Street,
            PropertyField::City,
            PropertyField::State,
            PropertyField::ZipCode,
            PropertyField::Country,
            PropertyField::Email,
            PropertyField::Website,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            PropertyField::Name => "Name",
            PropertyField::Description => "Description",
            PropertyField::Street => "Street",
            PropertyField::City => "City",
            PropertyField::State => "State",
            PropertyField::ZipCode => "Zip code",
            PropertyField::Country => "Country",
            PropertyField::Email => "Email",
            PropertyField::Website => "Website",
        }
    }

    fn error_key(&self) -> &'static str {
        match self {
            PropertyField::Name => "name",
            PropertyField::Description => "description",
            PropertyField::Street => "address.street",
            PropertyField::City => "address.city",
            PropertyField::State => "address.state",
            PropertyField::ZipCode => "address.zip_code",
            PropertyField::Country => "address.country",
            PropertyField::Email => "email",
            PropertyField::Website => "website",
        }
    }
}

pub struct AddPropertyView {
    focus: PropertyField,
    editing: bool,
    dismissed_error: Option<String>,
    spinner: Spinner,
}

impl AddPropertyView {
    pub fn new() -> Self {
        Self {
            focus: PropertyField::Name,
            editing: false,
            dismissed_error: None,
            spinner: Spinner::new(),
        }
    }

    pub fn input_active(&self) -> bool {
        self.editing
    }

    pub fn handle_key(&mut self, code: KeyCode, app: &App) {
        if app.add_property.is_submitting() {
            return;
        }
        if self.editing {
            self.handle_editing_key(code, app);
            return;
        }
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus = cycled(PropertyField::all(), &self.focus, -1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.focus = cycled(PropertyField::all(), &self.focus, 1);
            }
            KeyCode::Enter | KeyCode::Char('i') => self.editing = true,
            KeyCode::Char('s') => {
                let page = app.add_property.clone();
                tokio::spawn(async move { page.submit().await });
            }
            KeyCode::Char('c') => {
                app.add_property.reset();
                self.focus = PropertyField::Name;
                self.dismissed_error = None;
            }
            KeyCode::Char('x') => self.dismissed_error = app.add_property.error(),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, code: KeyCode, app: &App) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.editing = false,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = cycled(PropertyField::all(), &self.focus, 1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = cycled(PropertyField::all(), &self.focus, -1);
            }
            code => {
                let focus = self.focus;
                app.add_property.update_form(move |form| {
                    let buffer = match focus {
                        PropertyField::Name => &mut form.name,
                        PropertyField::Description => &mut form.description,
                        PropertyField::Street => &mut form.street,
                        PropertyField::City => &mut form.city,
                        PropertyField::State => &mut form.state,
                        PropertyField::ZipCode => &mut form.zip_code,
                        PropertyField::Country => &mut form.country,
                        PropertyField::Email => &mut form.email,
                        PropertyField::Website => &mut form.website,
                    };
                    edit_string(buffer, code);
                });
            }
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, app: &App) {
        self.spinner.tick();

        let error = app.add_property.error();
        let show_banner = match (&error, &self.dismissed_error) {
            (Some(e), Some(d)) => e != d,
            (Some(_), None) => true,
            _ => false,
        };

        let content = if show_banner {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            if let Some(message) = &error {
                render_error_banner(f, chunks[0], message);
            }
            chunks[1]
        } else {
            area
        };

        let form = app.add_property.form();
        let submitting = app.add_property.is_submitting();

        let mut lines: Vec<Line> = vec![Line::from("")];
        for field in PropertyField::all() {
            let value = match field {
                PropertyField::Name => &form.name,
                PropertyField::Description => &form.description,
                PropertyField::Street => &form.street,
                PropertyField::City => &form.city,
                PropertyField::State => &form.state,
                PropertyField::ZipCode => &form.zip_code,
                PropertyField::Country => &form.country,
                PropertyField::Email => &form.email,
                PropertyField::Website => &form.website,
            };
            let focused = *field == self.focus && !submitting;
            let mut form_field = FormField::new(field.label(), value)
                .focused(focused)
                .cursor(self.editing)
                .error(form.errors.get(field.error_key()));
            if matches!(field, PropertyField::Website) {
                form_field = form_field.placeholder("https://…");
            }
            lines.extend(form_field.lines());
        }
        lines.push(Line::from(""));

        if submitting {
            lines.push(Line::from(vec![
                Span::raw("  "),
                self.spinner.render(),
                Span::styled(" Creating property…", Style::default().fg(Color::DarkGray)),
            ]));
        } else if self.editing {
            lines.push(Line::from(Span::styled(
                "  typing edits the field │ Tab next │ Esc done",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "  Enter edit field │ s submit │ c clear",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Add property ");
        f.render_widget(Paragraph::new(lines).block(block), content);
    }
}

impl Default for AddPropertyView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;

    #[test]
    fn test_browse_typing_does_not_touch_the_form() {
        let (app, _dir) = testing::app();
        let mut view = AddPropertyView::new();
        view.handle_key(KeyCode::Char('z'), &app);
        assert!(app.add_property.form().name.is_empty());
    }

    #[test]
    fn test_edit_mode_fills_the_picked_field() {
        let (app, _dir) = testing::app();
        let mut view = AddPropertyView::new();
        view.handle_key(KeyCode::Char('i'), &app);
        assert!(view.input_active());
        for c in "Inn".chars() {
            view.handle_key(KeyCode::Char(c), &app);
        }
        assert_eq!(app.add_property.form().name, "Inn");
        view.handle_key(KeyCode::Esc, &app);
        assert!(!view.input_active());
    }

    #[test]
    fn test_tab_advances_while_editing() {
        let (app, _dir) = testing::app();
        let mut view = AddPropertyView::new();
        view.handle_key(KeyCode::Char('i'), &app);
        view.handle_key(KeyCode::Tab, &app);
        assert_eq!(view.focus, PropertyField::Description);
        assert!(view.input_active());
        view.handle_key(KeyCode::Char('b'), &app);
        assert_eq!(app.add_property.form().description, "b");
    }

    #[test]
    fn test_field_selection_wraps() {
        let (app, _dir) = testing::app();
        let mut view = AddPropertyView::new();
        view.handle_key(KeyCode::Up, &app);
        assert_eq!(view.focus, PropertyField::Website);
        view.handle_key(KeyCode::Down, &app);
        assert_eq!(view.focus, PropertyField::Name);
    }

    #[test]
    fn test_clear_resets_form_and_focus() {
        let (app, _dir) = testing::app();
        let mut view = AddPropertyView::new();
        view.handle_key(KeyCode::Char('i'), &app);
        view.handle_key(KeyCode::Char('A'), &app);
        view.handle_key(KeyCode::Esc, &app);
        view.handle_key(KeyCode::Char('j'), &app);
        view.handle_key(KeyCode::Char('c'), &app);
        assert!(app.add_property.form().name.is_empty());
        assert_eq!(view.focus, PropertyField::Name);
    }
}

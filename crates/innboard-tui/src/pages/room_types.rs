//! Room types view
//!
//! # Features
//! - Room-type table with rate and capacity for the selected property
//! - Create/edit modal, numeric fields validated before submit
//! - Deletes guarded by a confirmation dialog
//!
//! # Keybindings
//! - `↑`/`k`, `↓`/`j`: move the selection
//! - `a`: add a room type, `e`/`Enter`: edit, `d`: delete
//! - `x`: dismiss the error banner
//!
//! Inside the modal: `Tab`/`↓` next field, `Shift+Tab`/`↑` previous,
//! `Enter` save, `Esc` cancel.

use crossterm::event::KeyCode;
use innboard_core::models::RoomType;
use innboard_core::pages::{ModalState, RoomTypeForm};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::components::{edit_string, ConfirmChoice, ConfirmDialog, FormField, Spinner};
use crate::empty_state;
use crate::pages::{cycled, render_error_banner};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomTypeField {
    Name,
    Description,
    BaseRate,
    Capacity,
}

impl RoomTypeField {
    fn all() -> &'static [RoomTypeField] {
        &[
            RoomTypeField::Name,
            RoomTypeField::Description,
            RoomTypeField::BaseRate,
            RoomTypeField::Capacity,
        ]
    }
}

pub struct RoomTypesView {
    table: TableState,
    focus: RoomTypeField,
    dismissed_error: Option<String>,
    confirm: ConfirmDialog,
    spinner: Spinner,
}

impl RoomTypesView {
    pub fn new() -> Self {
        Self {
            table: TableState::default(),
            focus: RoomTypeField::Name,
            dismissed_error: None,
            confirm: ConfirmDialog::new(),
            spinner: Spinner::new(),
        }
    }

    pub fn input_active(&self, app: &App) -> bool {
        self.confirm.visible || app.room_types.modal().is_open()
    }

    pub fn handle_key(&mut self, code: KeyCode, app: &App) {
        if self.confirm.visible {
            match self.confirm.handle_key(code) {
                Some(ConfirmChoice::Yes) => {
                    let page = app.room_types.clone();
                    tokio::spawn(async move { page.confirm_delete().await });
                }
                Some(ConfirmChoice::No) => app.room_types.cancel_delete(),
                None => {}
            }
            return;
        }

        if app.room_types.modal().is_open() {
            self.handle_modal_key(code, app);
            return;
        }

        let room_types = app.room_types.room_types();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(room_types.len()),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(room_types.len()),
            KeyCode::Char('a') => {
                self.focus = RoomTypeField::Name;
                app.room_types.open_create();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(room_type) = self.selected(&room_types) {
                    if app.room_types.open_edit(&room_type.id) {
                        self.focus = RoomTypeField::Name;
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(room_type) = self.selected(&room_types) {
                    if app.room_types.request_delete(&room_type.id) {
                        self.confirm.open(
                            "Delete room type",
                            format!(
                                "Delete room type {}? Rooms referencing it keep a dangling id.",
                                room_type.name
                            ),
                        );
                    }
                }
            }
            KeyCode::Char('x') => self.dismissed_error = app.room_types.error(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode, app: &App) {
        if app.room_types.modal().is_submitting() {
            return;
        }
        match code {
            KeyCode::Esc => app.room_types.close_modal(),
            KeyCode::Enter => {
                let page = app.room_types.clone();
                tokio::spawn(async move { page.submit().await });
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = cycled(RoomTypeField::all(), &self.focus, 1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = cycled(RoomTypeField::all(), &self.focus, -1);
            }
            code => {
                let focus = self.focus;
                app.room_types.update_form(move |form| {
                    let buffer = match focus {
                        RoomTypeField::Name => &mut form.name,
                        RoomTypeField::Description => &mut form.description,
                        RoomTypeField::BaseRate => &mut form.base_rate,
                        RoomTypeField::Capacity => &mut form.capacity,
                    };
                    edit_string(buffer, code);
                });
            }
        }
    }

    fn selected(&self, room_types: &[RoomType]) -> Option<RoomType> {
        self.table
            .selected()
            .and_then(|i| room_types.get(i))
            .cloned()
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.table.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table.select(Some(next));
    }

    fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let previous = match self.table.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table.select(Some(previous));
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, app: &App) {
        self.spinner.tick();

        if app.properties.is_empty() && !app.properties.is_loading() {
            empty_state::no_properties().render(f, area);
            return;
        }
        if app.properties.selected().is_none() {
            empty_state::no_property_selected().render(f, area);
            return;
        }

        let error = app.room_types.error();
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

        let room_types = app.room_types.room_types();
        if app.room_types.is_loading() && room_types.is_empty() {
            let line = Line::from(vec![
                self.spinner.render(),
                Span::styled(" Loading room types…", Style::default().fg(Color::DarkGray)),
            ]);
            f.render_widget(Paragraph::new(line), content);
        } else if room_types.is_empty() {
            empty_state::no_room_types().render(f, content);
        } else {
            self.render_table(f, content, app, &room_types);
        }

        let modal = app.room_types.modal();
        if let ModalState::Open {
            form,
            editing,
            error,
            submitting,
        } = &modal
        {
            self.render_modal(f, form, editing.is_some(), error.as_deref(), *submitting);
        }

        self.confirm.render(f);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect, app: &App, room_types: &[RoomType]) {
        let len = room_types.len();
        match self.table.selected() {
            None => self.table.select(Some(0)),
            Some(i) if i >= len => self.table.select(Some(len - 1)),
            _ => {}
        }

        let rows: Vec<Row> = room_types
            .iter()
            .map(|room_type| {
                Row::new(vec![
                    Cell::from(room_type.name.clone()),
                    Cell::from(Span::styled(
                        room_type.rate_display(),
                        Style::default().fg(Color::Green),
                    )),
                    Cell::from(format!("{} guests", room_type.capacity)),
                    Cell::from(room_type.description.clone().unwrap_or_else(|| "–".to_string())),
                ])
            })
            .collect();

        let header = Row::new(vec!["Name", "Base rate", "Capacity", "Description"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let title = if app.room_types.is_loading() {
            format!(" Room types ({len}) {} ", self.spinner.current_frame())
        } else {
            format!(" Room types ({len}) ")
        };

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(25),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Percentage(45),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().bg(Color::DarkGray));

        f.render_stateful_widget(table, area, &mut self.table);
    }

    fn render_modal(
        &self,
        f: &mut Frame,
        form: &RoomTypeForm,
        editing: bool,
        error: Option<&str>,
        submitting: bool,
    ) {
        let area = f.area();
        let width = (area.width / 2).clamp(40, area.width);

        let mut lines: Vec<Line> = vec![Line::from("")];
        lines.extend(
            FormField::new("Name", &form.name)
                .focused(self.focus == RoomTypeField::Name)
                .error(form.errors.get("name"))
                .lines(),
        );
        lines.extend(
            FormField::new("Description", &form.description)
                .focused(self.focus == RoomTypeField::Description)
                .placeholder("optional")
                .lines(),
        );
        lines.extend(
            FormField::new("Base rate", &form.base_rate)
                .focused(self.focus == RoomTypeField::BaseRate)
                .placeholder("per night")
                .error(form.errors.get("base_rate"))
                .lines(),
        );
        lines.extend(
            FormField::new("Capacity", &form.capacity)
                .focused(self.focus == RoomTypeField::Capacity)
                .placeholder("guests")
                .error(form.errors.get("capacity"))
                .lines(),
        );
        lines.push(Line::from(""));

        if submitting {
            lines.push(Line::from(vec![
                Span::raw("  "),
                self.spinner.render(),
                Span::styled(" Saving…", Style::default().fg(Color::DarkGray)),
            ]));
        } else if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {error}"),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "  Enter save │ Esc cancel │ Tab next field",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let height = (lines.len() as u16 + 2).min(area.height);
        let rect = Rect::new(
            area.width.saturating_sub(width) / 2,
            area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        let title = if editing {
            " Edit room type "
        } else {
            " Add room type "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::focused_border())
            .title(title);

        f.render_widget(Clear, rect);
        f.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

impl Default for RoomTypesView {
    fn default() -> Self {
        Self::new()
    }
}

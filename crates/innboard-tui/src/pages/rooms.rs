//! Rooms view
//!
//! # Features
//! - Rooms table for the selected property, status colored per room
//! - Create/edit modal with field validation shown inline
//! - Deletes guarded by a confirmation dialog
//! - Dismissible error banner when a fetch fails
//!
//! # Keybindings
//! - `↑`/`k`, `↓`/`j`: move the selection
//! - `a`: add a room, `e`/`Enter`: edit, `d`: delete
//! - `x`: dismiss the error banner
//!
//! Inside the modal: `Tab`/`↓` next field, `Shift+Tab`/`↑` previous,
//! `←`/`→` change a choice, `Space` toggle the amenity under the
//! cursor or the active flag, `Enter` save, `Esc` cancel.

use crossterm::event::KeyCode;
use innboard_core::models::room::amenity_label;
use innboard_core::models::{Room, RoomStatus, RoomType, AMENITIES, BED_TYPES};
use innboard_core::pages::{ModalState, RoomForm};
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
enum RoomField {
    RoomNumber,
    RoomType,
    Floor,
    Status,
    BedType,
    Description,
    Notes,
    Amenities,
    Active,
}

impl RoomField {
    fn all() -> &'static [RoomField] {
        &[
            RoomField::RoomNumber,
            RoomField::RoomType,
            RoomField::Floor,
            RoomField::Status,
            RoomField::BedType,
            RoomField::Description,
            RoomField::Notes,
            RoomField::Amenities,
            RoomField::Active,
        ]
    }
}

pub struct RoomsView {
    table: TableState,
    focus: RoomField,
    amenity_cursor: usize,
    dismissed_error: Option<String>,
    confirm: ConfirmDialog,
    spinner: Spinner,
}

impl RoomsView {
    pub fn new() -> Self {
        Self {
            table: TableState::default(),
            focus: RoomField::RoomNumber,
            amenity_cursor: 0,
            dismissed_error: None,
            confirm: ConfirmDialog::new(),
            spinner: Spinner::new(),
        }
    }

    /// True while a key press should stay on this view instead of the shell
    pub fn input_active(&self, app: &App) -> bool {
        self.confirm.visible || app.rooms.modal().is_open()
    }

    pub fn handle_key(&mut self, code: KeyCode, app: &App) {
        if self.confirm.visible {
            match self.confirm.handle_key(code) {
                Some(ConfirmChoice::Yes) => {
                    let rooms = app.rooms.clone();
                    tokio::spawn(async move { rooms.confirm_delete().await });
                }
                Some(ConfirmChoice::No) => app.rooms.cancel_delete(),
                None => {}
            }
            return;
        }

        if app.rooms.modal().is_open() {
            self.handle_modal_key(code, app);
            return;
        }

        let rooms = app.rooms.rooms();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(rooms.len()),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(rooms.len()),
            KeyCode::Char('a') => {
                self.focus = RoomField::RoomNumber;
                self.amenity_cursor = 0;
                app.rooms.open_create();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(room) = self.selected(&rooms) {
                    if app.rooms.open_edit(&room.id) {
                        self.focus = RoomField::RoomNumber;
                        self.amenity_cursor = 0;
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(room) = self.selected(&rooms) {
                    if app.rooms.request_delete(&room.id) {
                        self.confirm.open(
                            "Delete room",
                            format!("Delete room {}? This cannot be undone.", room.room_number),
                        );
                    }
                }
            }
            KeyCode::Char('x') => self.dismissed_error = app.rooms.error(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode, app: &App) {
        if app.rooms.modal().is_submitting() {
            return;
        }
        match code {
            KeyCode::Esc => app.rooms.close_modal(),
            KeyCode::Enter => {
                let rooms = app.rooms.clone();
                tokio::spawn(async move { rooms.submit().await });
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = cycled(RoomField::all(), &self.focus, 1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = cycled(RoomField::all(), &self.focus, -1);
            }
            KeyCode::Left => self.cycle_choice(app, -1),
            KeyCode::Right => self.cycle_choice(app, 1),
            KeyCode::Char(' ')
                if matches!(self.focus, RoomField::Amenities | RoomField::Active) =>
            {
                match self.focus {
                    RoomField::Amenities => {
                        let id = AMENITIES[self.amenity_cursor].id;
                        app.rooms.update_form(|form| form.toggle_amenity(id));
                    }
                    RoomField::Active => {
                        app.rooms.update_form(|form| form.is_active = !form.is_active);
                    }
                    _ => {}
                }
            }
            code => {
                let focus = self.focus;
                app.rooms.update_form(move |form| {
                    let buffer = match focus {
                        RoomField::RoomNumber => &mut form.room_number,
                        RoomField::Floor => &mut form.floor,
                        RoomField::Description => &mut form.description,
                        RoomField::Notes => &mut form.notes,
                        _ => return,
                    };
                    edit_string(buffer, code);
                });
            }
        }
    }

    fn cycle_choice(&mut self, app: &App, step: i64) {
        match self.focus {
            RoomField::RoomType => {
                let room_types = app.rooms.room_types();
                if room_types.is_empty() {
                    return;
                }
                app.rooms.update_form(move |form| {
                    let len = room_types.len() as i64;
                    let base = room_types
                        .iter()
                        .position(|rt| rt.id == form.room_type_id)
                        .map(|i| i as i64)
                        .unwrap_or(if step > 0 { -1 } else { 0 });
                    form.room_type_id = room_types[(base + step).rem_euclid(len) as usize]
                        .id
                        .clone();
                });
            }
            RoomField::Status => {
                app.rooms
                    .update_form(move |form| form.status = cycled(RoomStatus::all(), &form.status, step));
            }
            RoomField::BedType => {
                app.rooms.update_form(move |form| {
                    let len = BED_TYPES.len() as i64;
                    let base = BED_TYPES
                        .iter()
                        .position(|b| *b == form.bed_type)
                        .map(|i| i as i64)
                        .unwrap_or(if step > 0 { -1 } else { 0 });
                    form.bed_type = BED_TYPES[(base + step).rem_euclid(len) as usize].to_string();
                });
            }
            RoomField::Amenities => {
                let len = AMENITIES.len() as i64;
                let next = (self.amenity_cursor as i64 + step).rem_euclid(len);
                self.amenity_cursor = next as usize;
            }
            RoomField::Active => {
                app.rooms.update_form(|form| form.is_active = !form.is_active);
            }
            _ => {}
        }
    }

    fn selected(&self, rooms: &[Room]) -> Option<Room> {
        self.table.selected().and_then(|i| rooms.get(i)).cloned()
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

        let error = app.rooms.error();
        let show_banner = matches!(
            (&error, &self.dismissed_error),
            (Some(e), Some(d)) if e != d
        ) || matches!((&error, &self.dismissed_error), (Some(_), None));

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

        let rooms = app.rooms.rooms();
        if app.rooms.is_loading() && rooms.is_empty() {
            self.render_loading(f, content);
        } else if rooms.is_empty() {
            empty_state::no_rooms().render(f, content);
        } else {
            self.render_table(f, content, app, &rooms);
        }

        let modal = app.rooms.modal();
        if let ModalState::Open {
            form,
            editing,
            error,
            submitting,
        } = &modal
        {
            self.render_modal(f, app, form, editing.is_some(), error.as_deref(), *submitting);
        }

        self.confirm.render(f);
    }

    fn render_loading(&self, f: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            self.spinner.render(),
            Span::styled(" Loading rooms…", Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect, app: &App, rooms: &[Room]) {
        let len = rooms.len();
        match self.table.selected() {
            None => self.table.select(Some(0)),
            Some(i) if i >= len => self.table.select(Some(len - 1)),
            _ => {}
        }

        let room_types = app.rooms.room_types();
        let rows: Vec<Row> = rooms
            .iter()
            .map(|room| {
                let type_name = room
                    .room_type
                    .name()
                    .map(str::to_string)
                    .or_else(|| type_name_for(&room_types, room.room_type_id()))
                    .unwrap_or_else(|| "?".to_string());
                let amenities = if room.amenities.is_empty() {
                    "–".to_string()
                } else {
                    room.amenities
                        .iter()
                        .map(|id| amenity_label(id))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                Row::new(vec![
                    Cell::from(room.room_number.clone()),
                    Cell::from(type_name),
                    Cell::from(room.floor.to_string()),
                    Cell::from(Span::styled(
                        room.status.label(),
                        Style::default().fg(theme::room_status_color(room.status)),
                    )),
                    Cell::from(if room.bed_type.is_empty() {
                        "–".to_string()
                    } else {
                        room.bed_type.clone()
                    }),
                    Cell::from(amenities),
                    Cell::from(if room.is_active {
                        Span::styled("✓", Style::default().fg(Color::Green))
                    } else {
                        Span::styled("–", Style::default().fg(Color::DarkGray))
                    }),
                ])
            })
            .collect();

        let header = Row::new(vec![
            "Room", "Type", "Floor", "Status", "Beds", "Amenities", "Active",
        ])
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let title = if app.rooms.is_loading() {
            format!(" Rooms ({len}) {} ", self.spinner.current_frame())
        } else {
            format!(" Rooms ({len}) ")
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Percentage(20),
                Constraint::Length(6),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Percentage(30),
                Constraint::Length(7),
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
        app: &App,
        form: &RoomForm,
        editing: bool,
        error: Option<&str>,
        submitting: bool,
    ) {
        let area = f.area();
        let width = (area.width * 3 / 5).clamp(40, area.width);
        let room_types = app.rooms.room_types();
        let type_display = room_types
            .iter()
            .find(|rt| rt.id == form.room_type_id)
            .map(|rt| rt.name.clone())
            .unwrap_or_else(|| "(none)".to_string());
        let amenity = AMENITIES[self.amenity_cursor];
        let amenity_display = format!(
            "{} {} ({} selected)",
            if form.has_amenity(amenity.id) { "✓" } else { "·" },
            amenity.label,
            form.amenities.len()
        );

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(""));
        lines.extend(
            FormField::new("Room number", &form.room_number)
                .focused(self.focus == RoomField::RoomNumber)
                .error(form.errors.get("room_number"))
                .lines(),
        );
        lines.extend(
            FormField::new("Room type", &type_display)
                .focused(self.focus == RoomField::RoomType)
                .selector()
                .error(form.errors.get("room_type"))
                .lines(),
        );
        lines.extend(
            FormField::new("Floor", &form.floor)
                .focused(self.focus == RoomField::Floor)
                .error(form.errors.get("floor"))
                .lines(),
        );
        lines.extend(
            FormField::new("Status", form.status.label())
                .focused(self.focus == RoomField::Status)
                .selector()
                .lines(),
        );
        lines.extend(
            FormField::new(
                "Bed type",
                if form.bed_type.is_empty() {
                    "(none)"
                } else {
                    &form.bed_type
                },
            )
            .focused(self.focus == RoomField::BedType)
            .selector()
            .error(form.errors.get("bed_type"))
            .lines(),
        );
        lines.extend(
            FormField::new("Description", &form.description)
                .focused(self.focus == RoomField::Description)
                .placeholder("optional")
                .lines(),
        );
        lines.extend(
            FormField::new("Notes", &form.notes)
                .focused(self.focus == RoomField::Notes)
                .placeholder("optional")
                .lines(),
        );
        lines.extend(
            FormField::new("Amenities", &amenity_display)
                .focused(self.focus == RoomField::Amenities)
                .selector()
                .lines(),
        );
        lines.extend(
            FormField::new("Active", if form.is_active { "yes" } else { "no" })
                .focused(self.focus == RoomField::Active)
                .selector()
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
                "  Enter save │ Esc cancel │ ←/→ change │ Space toggle",
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
        let title = if editing { " Edit room " } else { " Add room " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::focused_border())
            .title(title);

        f.render_widget(Clear, rect);
        f.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

impl Default for RoomsView {
    fn default() -> Self {
        Self::new()
    }
}

fn type_name_for(room_types: &[RoomType], id: &str) -> Option<String> {
    room_types
        .iter()
        .find(|rt| rt.id == id)
        .map(|rt| rt.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;

    #[test]
    fn test_form_focus_cycles_through_every_field() {
        let mut focus = RoomField::RoomNumber;
        for _ in 0..RoomField::all().len() {
            focus = cycled(RoomField::all(), &focus, 1);
        }
        assert_eq!(focus, RoomField::RoomNumber);
        assert_eq!(
            cycled(RoomField::all(), &RoomField::RoomNumber, -1),
            RoomField::Active
        );
    }

    #[test]
    fn test_add_opens_create_modal_and_resets_focus() {
        let (app, _dir) = testing::app();
        let mut view = RoomsView::new();
        view.focus = RoomField::Notes;
        view.handle_key(KeyCode::Char('a'), &app);
        assert!(app.rooms.modal().is_open());
        assert_eq!(view.focus, RoomField::RoomNumber);
    }

    #[test]
    fn test_escape_closes_the_modal() {
        let (app, _dir) = testing::app();
        let mut view = RoomsView::new();
        view.handle_key(KeyCode::Char('a'), &app);
        assert!(app.rooms.modal().is_open());
        view.handle_key(KeyCode::Esc, &app);
        assert!(!app.rooms.modal().is_open());
    }

    #[test]
    fn test_space_toggles_amenity_under_cursor() {
        let (app, _dir) = testing::app();
        let mut view = RoomsView::new();
        view.handle_key(KeyCode::Char('a'), &app);
        view.focus = RoomField::Amenities;
        view.handle_key(KeyCode::Char(' '), &app);
        let form = app.rooms.modal().form().cloned().unwrap();
        assert_eq!(form.amenities, vec![AMENITIES[0].id.to_string()]);
        view.handle_key(KeyCode::Char(' '), &app);
        let form = app.rooms.modal().form().cloned().unwrap();
        assert!(form.amenities.is_empty());
    }

    #[test]
    fn test_typing_lands_in_the_focused_field() {
        let (app, _dir) = testing::app();
        let mut view = RoomsView::new();
        view.handle_key(KeyCode::Char('a'), &app);
        view.handle_key(KeyCode::Char('1'), &app);
        view.handle_key(KeyCode::Char('0'), &app);
        view.handle_key(KeyCode::Char('1'), &app);
        let form = app.rooms.modal().form().cloned().unwrap();
        assert_eq!(form.room_number, "101");
    }

    #[test]
    fn test_status_choice_cycles() {
        let (app, _dir) = testing::app();
        let mut view = RoomsView::new();
        view.handle_key(KeyCode::Char('a'), &app);
        view.focus = RoomField::Status;
        view.handle_key(KeyCode::Right, &app);
        let form = app.rooms.modal().form().cloned().unwrap();
        assert_eq!(form.status, RoomStatus::Occupied);
        view.handle_key(KeyCode::Left, &app);
        let form = app.rooms.modal().form().cloned().unwrap();
        assert_eq!(form.status, RoomStatus::Available);
    }

    #[test]
    fn test_selection_wraps_in_both_directions() {
        let mut view = RoomsView::new();
        view.select_next(3);
        assert_eq!(view.table.selected(), Some(0));
        view.select_previous(3);
        assert_eq!(view.table.selected(), Some(2));
        view.select_next(3);
        assert_eq!(view.table.selected(), Some(0));
    }

    #[test]
    fn test_selection_ignores_empty_list() {
        let mut view = RoomsView::new();
        view.select_next(0);
        assert_eq!(view.table.selected(), None);
    }
}

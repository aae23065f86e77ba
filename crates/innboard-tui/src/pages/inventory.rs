//! Inventory view: reservations with server-side filters and paging
//!
//! # Features
//! - Paged reservation table, filtered on the server
//! - Filter bar covering status, guest, dates, source, room type, room
//! - Create/edit modal for full reservations
//! - Copies a reservation number to the clipboard
//!
//! # Keybindings
//! - `↑`/`k`, `↓`/`j`: move the selection
//! - `←`/`→`: previous / next page
//! - `f`: edit filters, `c`: clear filters
//! - `a`: add, `e`/`Enter`: edit, `d`: delete, `y`: copy number
//! - `x`: dismiss the error banner
//!
//! While editing filters: `Tab`/`Shift+Tab` move between slots, `↑`/`↓`
//! cycle status and source values, type into the rest, `Enter`/`Esc`
//! apply and fetch.

use crossterm::event::KeyCode;
use innboard_core::models::{
    FilterField, PaymentStatus, Reservation, ReservationSource, ReservationStatus,
};
use innboard_core::pages::{ModalState, ReservationForm};
use innboard_core::Notice;
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
enum Mode {
    Browse,
    Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReservationField {
    Number,
    GuestFirst,
    GuestLast,
    GuestEmail,
    GuestPhone,
    RoomType,
    CheckIn,
    CheckOut,
    Status,
    TotalAmount,
    Payment,
    Source,
    SpecialRequests,
    Notes,
}

impl ReservationField {
    fn all() -> &'static [ReservationField] {
        &[
            ReservationField::Number,
            ReservationField::GuestFirst,
            ReservationField::GuestLast,
            ReservationField::GuestEmail,
            ReservationField::GuestPhone,
            ReservationField::RoomType,
            ReservationField::CheckIn,
            ReservationField::CheckOut,
            ReservationField::Status,
            ReservationField::TotalAmount,
            ReservationField::Payment,
            ReservationField::Source,
            ReservationField::SpecialRequests,
            ReservationField::Notes,
        ]
    }
}

pub struct InventoryView {
    table: TableState,
    mode: Mode,
    filter_focus: FilterField,
    focus: ReservationField,
    dismissed_error: Option<String>,
    confirm: ConfirmDialog,
    spinner: Spinner,
}

impl InventoryView {
    pub fn new() -> Self {
        Self {
            table: TableState::default(),
            mode: Mode::Browse,
            filter_focus: FilterField::Status,
            focus: ReservationField::Number,
            dismissed_error: None,
            confirm: ConfirmDialog::new(),
            spinner: Spinner::new(),
        }
    }

    pub fn input_active(&self, app: &App) -> bool {
        self.confirm.visible || self.mode == Mode::Filters || app.inventory.modal().is_open()
    }

    pub fn handle_key(&mut self, code: KeyCode, app: &App) {
        if self.confirm.visible {
            match self.confirm.handle_key(code) {
                Some(ConfirmChoice::Yes) => {
                    let page = app.inventory.clone();
                    tokio::spawn(async move { page.confirm_delete().await });
                }
                Some(ConfirmChoice::No) => app.inventory.cancel_delete(),
                None => {}
            }
            return;
        }

        if app.inventory.modal().is_open() {
            self.handle_modal_key(code, app);
            return;
        }

        if self.mode == Mode::Filters {
            self.handle_filter_key(code, app);
            return;
        }

        let reservations = app.inventory.reservations();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(reservations.len()),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(reservations.len()),
            KeyCode::Left => {
                if app.inventory.prev_page() {
                    spawn_refresh(app);
                }
            }
            KeyCode::Right => {
                if app.inventory.next_page() {
                    spawn_refresh(app);
                }
            }
            KeyCode::Char('f') => self.mode = Mode::Filters,
            KeyCode::Char('c') => {
                if app.inventory.has_filters() {
                    app.inventory.clear_filters();
                    spawn_refresh(app);
                }
            }
            KeyCode::Char('a') => {
                self.focus = ReservationField::Number;
                app.inventory.open_create();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(reservation) = self.selected(&reservations) {
                    if app.inventory.open_edit(&reservation.id) {
                        self.focus = ReservationField::Number;
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(reservation) = self.selected(&reservations) {
                    if app.inventory.request_delete(&reservation.id) {
                        self.confirm.open(
                            "Delete reservation",
                            format!(
                                "Delete reservation {}? This cannot be undone.",
                                reservation.reservation_number
                            ),
                        );
                    }
                }
            }
            KeyCode::Char('y') => {
                if let Some(reservation) = self.selected(&reservations) {
                    self.copy_number(app, &reservation.reservation_number);
                }
            }
            KeyCode::Char('x') => self.dismissed_error = app.inventory.error(),
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, code: KeyCode, app: &App) {
        match code {
            KeyCode::Enter | KeyCode::Esc => {
                self.mode = Mode::Browse;
                spawn_refresh(app);
            }
            KeyCode::Tab => {
                self.filter_focus = cycled(FilterField::all(), &self.filter_focus, 1);
            }
            KeyCode::BackTab => {
                self.filter_focus = cycled(FilterField::all(), &self.filter_focus, -1);
            }
            KeyCode::Up => self.cycle_filter_value(app, -1),
            KeyCode::Down => self.cycle_filter_value(app, 1),
            code => {
                if matches!(self.filter_focus, FilterField::Status | FilterField::Source) {
                    return;
                }
                let mut value = app.inventory.filters().get(self.filter_focus).to_string();
                if edit_string(&mut value, code) {
                    app.inventory.set_filter(self.filter_focus, value);
                }
            }
        }
    }

    /// Status and source filters step through the enum values plus "any"
    fn cycle_filter_value(&mut self, app: &App, step: i64) {
        let values: Vec<String> = match self.filter_focus {
            FilterField::Status => std::iter::once(String::new())
                .chain(
                    ReservationStatus::all()
                        .iter()
                        .map(|s| s.as_str().to_string()),
                )
                .collect(),
            FilterField::Source => std::iter::once(String::new())
                .chain(
                    ReservationSource::all()
                        .iter()
                        .map(|s| s.as_str().to_string()),
                )
                .collect(),
            _ => return,
        };
        let current = app.inventory.filters().get(self.filter_focus).to_string();
        let len = values.len() as i64;
        let base = values
            .iter()
            .position(|v| *v == current)
            .map(|i| i as i64)
            .unwrap_or(0);
        let next = (base + step).rem_euclid(len) as usize;
        app.inventory.set_filter(self.filter_focus, values[next].clone());
    }

    fn handle_modal_key(&mut self, code: KeyCode, app: &App) {
        if app.inventory.modal().is_submitting() {
            return;
        }
        match code {
            KeyCode::Esc => app.inventory.close_modal(),
            KeyCode::Enter => {
                let page = app.inventory.clone();
                tokio::spawn(async move { page.submit().await });
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = cycled(ReservationField::all(), &self.focus, 1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = cycled(ReservationField::all(), &self.focus, -1);
            }
            KeyCode::Left => self.cycle_choice(app, -1),
            KeyCode::Right => self.cycle_choice(app, 1),
            code => {
                let focus = self.focus;
                app.inventory.update_form(move |form| {
                    let buffer = match focus {
                        ReservationField::Number => &mut form.reservation_number,
                        ReservationField::GuestFirst => &mut form.guest_first_name,
                        ReservationField::GuestLast => &mut form.guest_last_name,
                        ReservationField::GuestEmail => &mut form.guest_email,
                        ReservationField::GuestPhone => &mut form.guest_phone,
                        ReservationField::CheckIn => &mut form.check_in,
                        ReservationField::CheckOut => &mut form.check_out,
                        ReservationField::TotalAmount => &mut form.total_amount,
                        ReservationField::SpecialRequests => &mut form.special_requests,
                        ReservationField::Notes => &mut form.notes,
                        _ => return,
                    };
                    edit_string(buffer, code);
                });
            }
        }
    }

    fn cycle_choice(&mut self, app: &App, step: i64) {
        match self.focus {
            ReservationField::RoomType => {
                let room_types = app.inventory.room_types();
                if room_types.is_empty() {
                    return;
                }
                app.inventory.update_form(move |form| {
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
            ReservationField::Status => {
                app.inventory.update_form(move |form| {
                    form.status = cycled(ReservationStatus::all(), &form.status, step);
                });
            }
            ReservationField::Payment => {
                app.inventory.update_form(move |form| {
                    form.payment_status = cycled(PaymentStatus::all(), &form.payment_status, step);
                });
            }
            ReservationField::Source => {
                app.inventory.update_form(move |form| {
                    form.source = cycled(ReservationSource::all(), &form.source, step);
                });
            }
            _ => {}
        }
    }

    fn copy_number(&self, app: &App, number: &str) {
        let copied = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(number.to_string()));
        match copied {
            Ok(()) => app
                .bus
                .notify(Notice::success(format!("Copied {number} to clipboard"))),
            Err(err) => app
                .bus
                .notify(Notice::error(format!("Clipboard error: {err}"))),
        }
    }

    fn selected(&self, reservations: &[Reservation]) -> Option<Reservation> {
        self.table
            .selected()
            .and_then(|i| reservations.get(i))
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

        let error = app.inventory.error();
        let show_banner = match (&error, &self.dismissed_error) {
            (Some(e), Some(d)) => e != d,
            (Some(_), None) => true,
            _ => false,
        };

        let mut constraints = vec![Constraint::Length(3), Constraint::Min(0)];
        if show_banner {
            constraints.insert(0, Constraint::Length(3));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut index = 0;
        if show_banner {
            if let Some(message) = &error {
                render_error_banner(f, chunks[index], message);
            }
            index += 1;
        }
        self.render_filter_bar(f, chunks[index], app);
        let content = chunks[index + 1];

        let reservations = app.inventory.reservations();
        if app.inventory.is_loading() && reservations.is_empty() {
            let line = Line::from(vec![
                self.spinner.render(),
                Span::styled(
                    " Loading reservations…",
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            f.render_widget(Paragraph::new(line), content);
        } else if reservations.is_empty() {
            empty_state::no_reservations(app.inventory.has_filters()).render(f, content);
        } else {
            self.render_table(f, content, app, &reservations);
        }

        let modal = app.inventory.modal();
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

    fn render_filter_bar(&self, f: &mut Frame, area: Rect, app: &App) {
        let editing = self.mode == Mode::Filters;
        let filters = app.inventory.filters();

        let mut spans: Vec<Span> = Vec::new();
        for (i, field) in FilterField::all().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            let focused = editing && *field == self.filter_focus;
            let label_style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!("{}: ", field.label()), label_style));
            let value = filters.get(*field);
            if value.is_empty() {
                spans.push(Span::styled(
                    "·".to_string(),
                    Style::default().fg(Color::DarkGray),
                ));
            } else {
                spans.push(Span::styled(
                    value.to_string(),
                    Style::default().fg(Color::White),
                ));
            }
            if focused {
                spans.push(Span::styled(
                    "_",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::SLOW_BLINK),
                ));
            }
        }

        let title = if editing {
            " Filters (Enter apply) "
        } else {
            " Filters (f edit · c clear) "
        };
        let block = Block::default().borders(Borders::ALL).title(title).border_style(
            if editing {
                theme::focused_border()
            } else {
                theme::unfocused_border()
            },
        );
        f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect, app: &App, reservations: &[Reservation]) {
        let len = reservations.len();
        match self.table.selected() {
            None => self.table.select(Some(0)),
            Some(i) if i >= len => self.table.select(Some(len - 1)),
            _ => {}
        }

        let rows: Vec<Row> = reservations
            .iter()
            .map(|reservation| {
                Row::new(vec![
                    Cell::from(reservation.reservation_number.clone()),
                    Cell::from(reservation.guest.full_name()),
                    Cell::from(reservation.dates_display()),
                    Cell::from(format!("{}", reservation.nights())),
                    Cell::from(Span::styled(
                        reservation.status.label(),
                        Style::default().fg(theme::reservation_status_color(reservation.status)),
                    )),
                    Cell::from(format!("${:.2}", reservation.total_amount)),
                    Cell::from(Span::styled(
                        reservation.payment_status.label(),
                        Style::default().fg(theme::payment_status_color(reservation.payment_status)),
                    )),
                    Cell::from(reservation.source.label()),
                ])
            })
            .collect();

        let header = Row::new(vec![
            "Res #", "Guest", "Dates", "Nights", "Status", "Total", "Payment", "Source",
        ])
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let spinner = if app.inventory.is_loading() {
            format!(" {}", self.spinner.current_frame())
        } else {
            String::new()
        };
        let title = format!(
            " Reservations (page {}/{} · {} total){} ",
            app.inventory.page(),
            app.inventory.pages(),
            app.inventory.total(),
            spinner
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Percentage(18),
                Constraint::Length(24),
                Constraint::Length(6),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Length(11),
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
        form: &ReservationForm,
        editing: bool,
        error: Option<&str>,
        submitting: bool,
    ) {
        let area = f.area();
        let width = (area.width * 3 / 5).clamp(48, area.width);
        let room_types = app.inventory.room_types();
        let type_display = room_types
            .iter()
            .find(|rt| rt.id == form.room_type_id)
            .map(|rt| rt.name.clone())
            .unwrap_or_else(|| "(none)".to_string());

        let mut lines: Vec<Line> = vec![Line::from("")];
        lines.extend(
            FormField::new("Number", &form.reservation_number)
                .focused(self.focus == ReservationField::Number)
                .placeholder("auto")
                .error(form.errors.get("reservation_number"))
                .lines(),
        );
        lines.extend(
            FormField::new("First name", &form.guest_first_name)
                .focused(self.focus == ReservationField::GuestFirst)
                .error(form.errors.get("guest.first_name"))
                .lines(),
        );
        lines.extend(
            FormField::new("Last name", &form.guest_last_name)
                .focused(self.focus == ReservationField::GuestLast)
                .error(form.errors.get("guest.last_name"))
                .lines(),
        );
        lines.extend(
            FormField::new("Email", &form.guest_email)
                .focused(self.focus == ReservationField::GuestEmail)
                .error(form.errors.get("guest.email"))
                .lines(),
        );
        lines.extend(
            FormField::new("Phone", &form.guest_phone)
                .focused(self.focus == ReservationField::GuestPhone)
                .placeholder("optional")
                .lines(),
        );
        lines.extend(
            FormField::new("Room type", &type_display)
                .focused(self.focus == ReservationField::RoomType)
                .selector()
                .error(form.errors.get("room_type_id"))
                .lines(),
        );
        lines.extend(
            FormField::new("Check-in", &form.check_in)
                .focused(self.focus == ReservationField::CheckIn)
                .placeholder("YYYY-MM-DD")
                .error(form.errors.get("check_in_date"))
                .lines(),
        );
        lines.extend(
            FormField::new("Check-out", &form.check_out)
                .focused(self.focus == ReservationField::CheckOut)
                .placeholder("YYYY-MM-DD")
                .error(form.errors.get("check_out_date"))
                .lines(),
        );
        lines.extend(
            FormField::new("Status", form.status.label())
                .focused(self.focus == ReservationField::Status)
                .selector()
                .lines(),
        );
        lines.extend(
            FormField::new("Total", &form.total_amount)
                .focused(self.focus == ReservationField::TotalAmount)
                .error(form.errors.get("total_amount"))
                .lines(),
        );
        lines.extend(
            FormField::new("Payment", form.payment_status.label())
                .focused(self.focus == ReservationField::Payment)
                .selector()
                .lines(),
        );
        lines.extend(
            FormField::new("Source", form.source.label())
                .focused(self.focus == ReservationField::Source)
                .selector()
                .lines(),
        );
        lines.extend(
            FormField::new("Requests", &form.special_requests)
                .focused(self.focus == ReservationField::SpecialRequests)
                .placeholder("optional")
                .lines(),
        );
        lines.extend(
            FormField::new("Notes", &form.notes)
                .focused(self.focus == ReservationField::Notes)
                .placeholder("optional")
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
                "  Enter save │ Esc cancel │ ←/→ change",
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
            " Edit reservation "
        } else {
            " Add reservation "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::focused_border())
            .title(title);

        f.render_widget(Clear, rect);
        f.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

impl Default for InventoryView {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_refresh(app: &App) {
    let page = app.inventory.clone();
    tokio::spawn(async move { page.refresh().await });
}

//! Frame composition: header, active view, status bar, overlays
//!
//! `Ui` owns one view struct per page plus the login screen, routes
//! keys to whichever is active, and draws the shared chrome around
//! them. Toasts render last so they sit above everything.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Page};
use crate::components::Spinner;
use crate::pages::{
    AddPropertyView, InventoryView, LoginView, RoomTypesView, RoomsView, TasksView,
};

pub struct Ui {
    login: LoginView,
    rooms: RoomsView,
    room_types: RoomTypesView,
    inventory: InventoryView,
    tasks: TasksView,
    add_property: AddPropertyView,
    spinner: Spinner,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            login: LoginView::new(),
            rooms: RoomsView::new(),
            room_types: RoomTypesView::new(),
            inventory: InventoryView::new(),
            tasks: TasksView::new(),
            add_property: AddPropertyView::new(),
            spinner: Spinner::new(),
        }
    }

    /// True while the active view is consuming raw text input, which
    /// suppresses the global shortcuts
    pub fn text_input_active(&self, app: &App) -> bool {
        match app.active_page {
            Page::AddProperty => self.add_property.input_active(),
            Page::Rooms => self.rooms.input_active(app),
            Page::RoomTypes => self.room_types.input_active(app),
            Page::Inventory => self.inventory.input_active(app),
            Page::Tasks => self.tasks.input_active(),
        }
    }

    pub fn handle_login_key(&mut self, code: KeyCode, app: &App) {
        self.login.handle_key(code, &app.session);
    }

    pub fn handle_page_key(&mut self, code: KeyCode, app: &App) {
        match app.active_page {
            Page::AddProperty => self.add_property.handle_key(code, app),
            Page::Rooms => self.rooms.handle_key(code, app),
            Page::RoomTypes => self.room_types.handle_key(code, app),
            Page::Inventory => self.inventory.handle_key(code, app),
            Page::Tasks => self.tasks.handle_key(code, app),
        }
    }

    pub fn render(&mut self, f: &mut Frame, app: &App) {
        if app.bootstrapping {
            self.render_loading_screen(f);
            return;
        }

        if !app.session.is_authenticated() {
            self.login.poll();
            self.login.render(f, f.area());
            app.toasts.render(f);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0], app);
        match app.active_page {
            Page::AddProperty => self.add_property.render(f, chunks[1], app),
            Page::Rooms => self.rooms.render(f, chunks[1], app),
            Page::RoomTypes => self.room_types.render(f, chunks[1], app),
            Page::Inventory => self.inventory.render(f, chunks[1], app),
            Page::Tasks => self.tasks.render(f, chunks[1], app),
        }
        self.render_status_bar(f, chunks[2], app);

        app.toasts.render(f);
    }

    fn render_loading_screen(&mut self, f: &mut Frame) {
        self.spinner.tick();

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Length(7),
                Constraint::Percentage(40),
            ])
            .split(f.area());
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(vertical[1]);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "◈ innboard",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                self.spinner.render(),
                Span::raw(" Restoring session…"),
            ]),
            Line::from(Span::styled(
                "Press 'q' to quit",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, horizontal[1]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect, app: &App) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(13), Constraint::Min(0)])
            .split(rows[0]);

        f.render_widget(
            Paragraph::new(Span::styled(
                " ◈ innboard",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            top[0],
        );

        let titles: Vec<Line> = Page::all()
            .iter()
            .map(|page| Line::from(format!(" {} {} {} ", page.icon(), page.shortcut(), page.name())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(app.active_page.index())
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider("│");
        f.render_widget(tabs, top[1]);

        f.render_widget(
            Paragraph::new(Span::styled(
                property_line(app),
                Style::default().fg(Color::DarkGray),
            )),
            rows[1],
        );
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect, app: &App) {
        let text = format!(
            " ● {} properties │ q quit │ Tab page │ p property │ r refresh │ {}",
            app.properties.len(),
            status_hint(app.active_page)
        );
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
            area,
        );
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

/// Second header row: active property and how many there are
fn property_line(app: &App) -> String {
    let count = app.properties.len();
    match app.properties.selected() {
        Some(property) => {
            let address = property.address_display();
            if address.is_empty() {
                format!(" ⌂ {} │ {count} properties", property.name)
            } else {
                format!(" ⌂ {} · {address} │ {count} properties", property.name)
            }
        }
        None => format!(" ⌂ no property selected │ {count} properties"),
    }
}

fn status_hint(page: Page) -> &'static str {
    match page {
        Page::AddProperty => "Enter edit · s submit · c clear",
        Page::Rooms => "a add · e edit · d delete · w website",
        Page::RoomTypes => "a add · e edit · d delete",
        Page::Inventory => "f filters · ←/→ page · a add · y copy",
        Page::Tasks => "a add · e edit · d delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;

    #[test]
    fn test_fresh_ui_consumes_no_text_input() {
        let (app, _dir) = testing::app();
        let ui = Ui::new();
        assert!(!ui.text_input_active(&app));
    }

    #[test]
    fn test_task_editor_claims_text_input() {
        let (mut app, _dir) = testing::app();
        let mut ui = Ui::new();
        app.active_page = Page::Tasks;
        ui.handle_page_key(KeyCode::Char('a'), &app);
        assert!(ui.text_input_active(&app));
        ui.handle_page_key(KeyCode::Esc, &app);
        assert!(!ui.text_input_active(&app));
    }

    #[test]
    fn test_modal_on_rooms_page_claims_text_input() {
        let (mut app, _dir) = testing::app();
        let mut ui = Ui::new();
        app.active_page = Page::Rooms;
        ui.handle_page_key(KeyCode::Char('a'), &app);
        assert!(ui.text_input_active(&app));
    }

    #[test]
    fn test_every_page_has_a_status_hint() {
        for page in Page::all() {
            assert!(!status_hint(*page).is_empty());
        }
    }

    #[test]
    fn test_property_line_without_selection_counts_properties() {
        let (app, _dir) = testing::app();
        assert_eq!(property_line(&app), " ⌂ no property selected │ 0 properties");
    }
}

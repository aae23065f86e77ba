//! Application shell: page registry, global keys, and event pumping
//!
//! `App` owns the shared core handles (session, property store, page
//! controllers) plus the cross-page UI state. Views borrow it to reach
//! their controller; the run loop drives `handle_key` and
//! `poll_events` between draws.

use std::sync::Arc;

use crossterm::event::KeyCode;
use innboard_core::pages::{
    AddPropertyPage, InventoryPage, RoomTypesPage, RoomsPage, TasksPage,
};
use innboard_core::{ApiClient, DataEvent, EventBus, Notice, PropertyStore, SessionStore};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::components::{Toast, ToastManager};

/// Top-level pages in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AddProperty,
    Rooms,
    RoomTypes,
    Inventory,
    Tasks,
}

impl Page {
    pub fn all() -> &'static [Page] {
        &[
            Page::AddProperty,
            Page::Rooms,
            Page::RoomTypes,
            Page::Inventory,
            Page::Tasks,
        ]
    }

    pub fn index(&self) -> usize {
        Page::all().iter().position(|page| page == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Page {
        *Page::all().get(index).unwrap_or(&Page::Rooms)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::AddProperty => "Add Property",
            Page::Rooms => "Rooms",
            Page::RoomTypes => "Room Types",
            Page::Inventory => "Inventory",
            Page::Tasks => "Tasks",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Page::AddProperty => '1',
            Page::Rooms => '2',
            Page::RoomTypes => '3',
            Page::Inventory => '4',
            Page::Tasks => '5',
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Page::AddProperty => "⊕",
            Page::Rooms => "⌂",
            Page::RoomTypes => "❖",
            Page::Inventory => "▤",
            Page::Tasks => "✓",
        }
    }
}

pub struct App {
    pub client: Arc<ApiClient>,
    pub bus: EventBus,
    pub session: Arc<SessionStore>,
    pub properties: Arc<PropertyStore>,
    pub rooms: Arc<RoomsPage>,
    pub room_types: Arc<RoomTypesPage>,
    pub inventory: Arc<InventoryPage>,
    pub tasks: Arc<TasksPage>,
    pub add_property: Arc<AddPropertyPage>,
    pub active_page: Page,
    pub should_quit: bool,
    /// True until the startup session restore finishes
    pub bootstrapping: bool,
    pub toasts: ToastManager,
    event_rx: broadcast::Receiver<DataEvent>,
}

impl App {
    pub fn new(client: Arc<ApiClient>, session: Arc<SessionStore>, bus: EventBus) -> Self {
        let properties = Arc::new(PropertyStore::new(client.clone(), bus.clone()));
        let rooms = Arc::new(RoomsPage::new(
            client.clone(),
            properties.clone(),
            bus.clone(),
        ));
        let room_types = Arc::new(RoomTypesPage::new(
            client.clone(),
            properties.clone(),
            bus.clone(),
        ));
        let inventory = Arc::new(InventoryPage::new(
            client.clone(),
            properties.clone(),
            bus.clone(),
        ));
        let tasks = Arc::new(TasksPage::new(bus.clone()));
        let add_property = Arc::new(AddPropertyPage::new(
            client.clone(),
            properties.clone(),
            bus.clone(),
        ));
        let event_rx = bus.subscribe();

        Self {
            client,
            bus,
            session,
            properties,
            rooms,
            room_types,
            inventory,
            tasks,
            add_property,
            active_page: Page::Rooms,
            should_quit: false,
            bootstrapping: true,
            toasts: ToastManager::default(),
            event_rx,
        }
    }

    /// Global keys, tried before the active view. Returns true when
    /// the key was consumed.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Tab => {
                let next = (self.active_page.index() + 1) % Page::all().len();
                self.switch_page(Page::from_index(next));
                true
            }
            KeyCode::BackTab => {
                let count = Page::all().len();
                let previous = (self.active_page.index() + count - 1) % count;
                self.switch_page(Page::from_index(previous));
                true
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(page) = Page::all().iter().find(|page| page.shortcut() == c) {
                    self.switch_page(*page);
                    true
                } else {
                    false
                }
            }
            KeyCode::Char('p') => {
                self.cycle_property(1);
                true
            }
            KeyCode::Char('P') => {
                self.cycle_property(-1);
                true
            }
            KeyCode::Char('r') | KeyCode::F(5) => {
                self.refresh_all();
                true
            }
            KeyCode::Char('L') => {
                self.logout();
                true
            }
            KeyCode::Char('w') => {
                self.open_property_website();
                true
            }
            _ => false,
        }
    }

    pub fn switch_page(&mut self, page: Page) {
        if self.active_page == page {
            return;
        }
        debug!(page = page.name(), "switching page");
        self.active_page = page;
        self.refresh_active_page();
    }

    /// Re-fetch the data page under the cursor; no-op for local pages
    fn refresh_active_page(&self) {
        if !self.session.is_authenticated() {
            return;
        }
        match self.active_page {
            Page::Rooms => {
                let page = self.rooms.clone();
                tokio::spawn(async move { page.refresh().await });
            }
            Page::RoomTypes => {
                let page = self.room_types.clone();
                tokio::spawn(async move { page.refresh().await });
            }
            Page::Inventory => {
                let page = self.inventory.clone();
                tokio::spawn(async move { page.refresh().await });
            }
            Page::AddProperty | Page::Tasks => {}
        }
    }

    /// Steps the active property through the store's list, wrapping
    pub fn cycle_property(&mut self, step: i64) {
        let properties = self.properties.properties();
        if properties.is_empty() {
            return;
        }
        let len = properties.len() as i64;
        let base = self
            .properties
            .selected_id()
            .and_then(|id| properties.iter().position(|p| p.id == id))
            .map(|i| i as i64)
            .unwrap_or(if step > 0 { -1 } else { 0 });
        let next = &properties[(base + step).rem_euclid(len) as usize];
        if self.properties.select(&next.id) {
            self.toasts
                .success(format!("Selected property: {}", next.name));
            self.refresh_active_page();
        }
    }

    /// `r` / `F5`: refresh properties, then the active page, on one task
    pub fn refresh_all(&mut self) {
        if self.bootstrapping || !self.session.is_authenticated() {
            return;
        }
        let properties = self.properties.clone();
        let bus = self.bus.clone();
        let active = self.active_page;
        let rooms = self.rooms.clone();
        let room_types = self.room_types.clone();
        let inventory = self.inventory.clone();
        tokio::spawn(async move {
            properties.refresh().await;
            match properties.error() {
                None => bus.notify(Notice::success("Properties refreshed successfully")),
                Some(_) => bus.notify(Notice::error("Failed to refresh properties")),
            }
            match active {
                Page::Rooms => rooms.refresh().await,
                Page::RoomTypes => room_types.refresh().await,
                Page::Inventory => inventory.refresh().await,
                Page::AddProperty | Page::Tasks => {}
            }
        });
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.session.logout() {
            warn!(error = %err, "logout failed");
        }
    }

    /// `w`: open the selected property's website in the default browser
    pub fn open_property_website(&mut self) {
        let Some(property) = self.properties.selected() else {
            self.toasts.warning("No property selected");
            return;
        };
        if property.website.is_empty() {
            self.toasts.warning("Selected property has no website");
            return;
        }
        match open::that_detached(&property.website) {
            Ok(()) => self.toasts.info(format!("Opening {}", property.website)),
            Err(err) => self.toasts.error(format!("Could not open browser: {err}")),
        }
    }

    /// Drains the event bus into UI state; called once per frame
    pub fn poll_events(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(DataEvent::Notice(notice)) => self.toasts.push(Toast::from(notice)),
                Ok(DataEvent::AuthChanged) => self.on_auth_changed(),
                Ok(DataEvent::SessionExpired) => self.on_session_expired(),
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "event bus lagged");
                }
                Err(_) => break,
            }
        }
        self.toasts.clear_expired();
    }

    fn on_auth_changed(&mut self) {
        if self.bootstrapping {
            return;
        }
        if self.session.is_authenticated() {
            self.active_page = Page::Rooms;
            let properties = self.properties.clone();
            let rooms = self.rooms.clone();
            tokio::spawn(async move {
                properties.refresh().await;
                rooms.refresh().await;
            });
        } else {
            self.properties.clear();
        }
    }

    /// A request came back 401 mid-session: drop the stored session and
    /// tell the user why they are back on the login screen
    fn on_session_expired(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        self.session.expire();
        self.toasts
            .warning("Your session has expired. Please sign in again.");
    }

    pub fn complete_bootstrap(&mut self) {
        self.bootstrapping = false;
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use testing::app;

    #[test]
    fn test_page_order_and_shortcuts() {
        assert_eq!(Page::all().len(), 5);
        for (index, page) in Page::all().iter().enumerate() {
            assert_eq!(page.index(), index);
            assert_eq!(Page::from_index(index), *page);
        }
        assert_eq!(Page::AddProperty.shortcut(), '1');
        assert_eq!(Page::Tasks.shortcut(), '5');
    }

    #[test]
    fn test_from_index_out_of_range_falls_back_to_rooms() {
        assert_eq!(Page::from_index(99), Page::Rooms);
    }

    #[test]
    fn test_q_quits() {
        let (mut app, _dir) = app();
        assert!(!app.should_quit);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_cycles_pages() {
        let (mut app, _dir) = app();
        assert_eq!(app.active_page, Page::Rooms);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.active_page, Page::RoomTypes);
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.active_page, Page::Rooms);
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.active_page, Page::AddProperty);
    }

    #[test]
    fn test_digit_shortcuts_jump_to_pages() {
        let (mut app, _dir) = app();
        assert!(app.handle_key(KeyCode::Char('4')));
        assert_eq!(app.active_page, Page::Inventory);
        assert!(app.handle_key(KeyCode::Char('1')));
        assert_eq!(app.active_page, Page::AddProperty);
        // No page claims this digit
        assert!(!app.handle_key(KeyCode::Char('9')));
    }

    #[test]
    fn test_unknown_keys_fall_through() {
        let (mut app, _dir) = app();
        assert!(!app.handle_key(KeyCode::Char('z')));
        assert!(!app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn test_cycle_property_with_no_properties_is_a_noop() {
        let (mut app, _dir) = app();
        app.cycle_property(1);
        assert!(app.properties.selected_id().is_none());
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn test_session_expiry_is_ignored_when_signed_out() {
        let (mut app, _dir) = app();
        app.on_session_expired();
        assert!(app.toasts.is_empty());
    }
}

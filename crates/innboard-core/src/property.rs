//! Property list and active-property selection
//!
//! One property is "active" at a time and scopes every page. The selection
//! invariant: a selected id always refers to a property in the current
//! list. After every refresh the selection is re-resolved, keeping the
//! current choice when it survived and falling back to the first property
//! (or none) when it did not.

use crate::client::ApiClient;
use crate::event::{DataEvent, EventBus};
use crate::models::Property;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Banner text when the account has no properties
pub const NO_PROPERTIES_MESSAGE: &str = "No properties found";

/// Banner text when the list could not be fetched
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch properties. Please try again later.";

#[derive(Debug, Default)]
struct PropertyInner {
    properties: Vec<Property>,
    selected_id: Option<String>,
    loading: bool,
    error: Option<String>,
}

/// Shared store for the property list and the active selection
pub struct PropertyStore {
    client: Arc<ApiClient>,
    bus: EventBus,
    state: RwLock<PropertyInner>,
    /// Refresh generation; a refresh only applies its result if no newer
    /// refresh started while it was in flight.
    generation: AtomicU64,
}

impl PropertyStore {
    pub fn new(client: Arc<ApiClient>, bus: EventBus) -> Self {
        Self {
            client,
            bus,
            state: RwLock::new(PropertyInner::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn properties(&self) -> Vec<Property> {
        self.state.read().properties.clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state.read().selected_id.clone()
    }

    pub fn selected(&self) -> Option<Property> {
        let state = self.state.read();
        let id = state.selected_id.as_deref()?;
        state.properties.iter().find(|p| p.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().properties.is_empty()
    }

    /// Fetch the list and re-resolve the selection.
    ///
    /// Stale results are discarded: if another refresh starts while this one
    /// is in flight, the newer one settles the state.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        self.bus.publish(DataEvent::PropertiesUpdated);

        let result = self.client.list_properties().await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding stale property refresh");
            return;
        }

        {
            let mut state = self.state.write();
            state.loading = false;
            match result {
                Ok(list) => {
                    state.selected_id = resolve_selection(state.selected_id.as_deref(), &list);
                    state.error = if list.is_empty() {
                        Some(NO_PROPERTIES_MESSAGE.to_string())
                    } else {
                        None
                    };
                    state.properties = list;
                }
                Err(e) => {
                    tracing::warn!("property refresh failed: {e}");
                    self.bus.report_auth(&e);
                    // keep whatever list we had; the banner explains
                    state.error = Some(e.page_message(FETCH_FAILED_MESSAGE));
                }
            }
        }
        self.bus.publish(DataEvent::PropertiesUpdated);
    }

    /// Make a property the active one. Ignored unless the id is present in
    /// the current list.
    pub fn select(&self, id: &str) -> bool {
        let changed = {
            let mut state = self.state.write();
            if !state.properties.iter().any(|p| p.id == id) {
                return false;
            }
            if state.selected_id.as_deref() == Some(id) {
                false
            } else {
                state.selected_id = Some(id.to_string());
                true
            }
        };
        if changed {
            self.bus.publish(DataEvent::PropertiesUpdated);
        }
        true
    }

    /// Drop everything, e.g. on sign-out. Also invalidates any refresh
    /// still in flight.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.write() = PropertyInner::default();
        self.bus.publish(DataEvent::PropertiesUpdated);
    }

    #[cfg(test)]
    fn set_for_test(&self, properties: Vec<Property>, selected_id: Option<&str>) {
        let mut state = self.state.write();
        state.properties = properties;
        state.selected_id = selected_id.map(String::from);
    }
}

/// Selection rule shared by refresh and tests: keep the current id while it
/// exists, otherwise fall back to the first property.
fn resolve_selection(current: Option<&str>, properties: &[Property]) -> Option<String> {
    if let Some(id) = current {
        if properties.iter().any(|p| p.id == id) {
            return Some(id.to_string());
        }
    }
    properties.first().map(|p| p.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn property(id: &str, name: &str) -> Property {
        serde_json::from_value(serde_json::json!({ "_id": id, "name": name })).unwrap()
    }

    fn store() -> PropertyStore {
        let client =
            Arc::new(ApiClient::new(ApiConfig::with_base_url("http://localhost:9/api")).unwrap());
        PropertyStore::new(client, EventBus::default())
    }

    #[test]
    fn test_selection_kept_when_still_present() {
        let list = vec![property("p1", "One"), property("p2", "Two")];
        assert_eq!(resolve_selection(Some("p2"), &list), Some("p2".to_string()));
    }

    #[test]
    fn test_selection_falls_back_to_first_when_gone() {
        let list = vec![property("p1", "One"), property("p3", "Three")];
        assert_eq!(resolve_selection(Some("p2"), &list), Some("p1".to_string()));
    }

    #[test]
    fn test_selection_none_on_empty_list() {
        assert_eq!(resolve_selection(Some("p1"), &[]), None);
        assert_eq!(resolve_selection(None, &[]), None);
    }

    #[test]
    fn test_selection_defaults_to_first() {
        let list = vec![property("p1", "One"), property("p2", "Two")];
        assert_eq!(resolve_selection(None, &list), Some("p1".to_string()));
    }

    #[test]
    fn test_select_requires_membership() {
        let store = store();
        store.set_for_test(vec![property("p1", "One"), property("p2", "Two")], Some("p1"));

        assert!(store.select("p2"));
        assert_eq!(store.selected_id(), Some("p2".to_string()));

        assert!(!store.select("p9"));
        assert_eq!(store.selected_id(), Some("p2".to_string()));
    }

    #[test]
    fn test_selected_returns_full_record() {
        let store = store();
        store.set_for_test(vec![property("p1", "One"), property("p2", "Two")], Some("p2"));
        assert_eq!(store.selected().map(|p| p.name), Some("Two".to_string()));
    }

    #[test]
    fn test_clear_resets_everything() {
        let store = store();
        store.set_for_test(vec![property("p1", "One")], Some("p1"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.error(), None);
    }
}

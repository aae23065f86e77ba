//! Add-property page controller
//!
//! Full-page form rather than a modal. On success the property list is
//! refetched so the new site shows up in the selector immediately (and
//! becomes the active property when it is the first one).

use crate::client::ApiClient;
use crate::event::{DataEvent, EventBus, Notice};
use crate::property::PropertyStore;
use crate::validation::{check, AddressPayload, FieldErrors, PropertyPayload};
use parking_lot::RwLock;
use std::sync::Arc;

/// Editable state of the add-property form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyForm {
    pub name: String,
    pub description: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub email: String,
    pub website: String,
    pub errors: FieldErrors,
}

impl PropertyForm {
    pub fn validate(&self) -> Result<PropertyPayload, FieldErrors> {
        let payload = PropertyPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            address: AddressPayload {
                street: self.street.trim().to_string(),
                city: self.city.trim().to_string(),
                state: self.state.trim().to_string(),
                zip_code: self.zip_code.trim().to_string(),
                country: self.country.trim().to_string(),
            },
            email: self.email.trim().to_string(),
            website: self.website.trim().to_string(),
        };
        check(&payload).map(|()| payload)
    }
}

#[derive(Default)]
struct AddPropertyState {
    form: PropertyForm,
    submitting: bool,
    /// Submit failure shown above the form
    error: Option<String>,
}

/// Controller behind the add-property page
pub struct AddPropertyPage {
    client: Arc<ApiClient>,
    properties: Arc<PropertyStore>,
    bus: EventBus,
    state: RwLock<AddPropertyState>,
}

impl AddPropertyPage {
    pub fn new(client: Arc<ApiClient>, properties: Arc<PropertyStore>, bus: EventBus) -> Self {
        Self {
            client,
            properties,
            bus,
            state: RwLock::new(AddPropertyState::default()),
        }
    }

    pub fn form(&self) -> PropertyForm {
        self.state.read().form.clone()
    }

    pub fn update_form(&self, update: impl FnOnce(&mut PropertyForm)) {
        let mut state = self.state.write();
        if !state.submitting {
            update(&mut state.form);
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state.read().submitting
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn reset(&self) {
        let mut state = self.state.write();
        state.form = PropertyForm::default();
        state.error = None;
    }

    /// Validate and create. The form is cleared only on success, so a
    /// failure keeps everything typed so far.
    pub async fn submit(&self) {
        let form = {
            let state = self.state.read();
            if state.submitting {
                return;
            }
            state.form.clone()
        };

        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                self.state.write().form.errors = errors;
                self.bus.publish(DataEvent::PropertiesUpdated);
                return;
            }
        };

        {
            let mut state = self.state.write();
            state.submitting = true;
            state.error = None;
            state.form.errors = FieldErrors::new();
        }
        self.bus.publish(DataEvent::PropertiesUpdated);

        match self.client.create_property(&payload).await {
            Ok(property) => {
                {
                    let mut state = self.state.write();
                    state.submitting = false;
                    state.form = PropertyForm::default();
                }
                self.bus
                    .notify(Notice::success(format!("Property {} added", property.name)));
                self.properties.refresh().await;
            }
            Err(e) => {
                self.bus.report_auth(&e);
                let mut state = self.state.write();
                state.submitting = false;
                state.error = Some(e.page_message("Failed to add property"));
                drop(state);
                self.bus.publish(DataEvent::PropertiesUpdated);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> PropertyForm {
        PropertyForm {
            name: "Seaside Inn".to_string(),
            description: "Beachfront".to_string(),
            street: "1 Ocean Dr".to_string(),
            city: "Brighton".to_string(),
            state: "East Sussex".to_string(),
            zip_code: "BN1 1AA".to_string(),
            country: "UK".to_string(),
            email: "hello@seaside.example".to_string(),
            website: "https://seaside.example".to_string(),
            errors: FieldErrors::new(),
        }
    }

    #[test]
    fn test_validate_complete_form() {
        let payload = filled_form().validate().unwrap();
        assert_eq!(payload.name, "Seaside Inn");
        assert_eq!(payload.address.zip_code, "BN1 1AA");
    }

    #[test]
    fn test_validate_requires_every_field() {
        let errors = PropertyForm::default().validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Property name is required"));
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.get("address.street"), Some("Street address is required"));
        assert_eq!(errors.get("address.zip_code"), Some("ZIP code is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("website"), Some("Website is required"));
    }

    #[test]
    fn test_validate_checks_formats() {
        let form = PropertyForm {
            email: "bad".to_string(),
            website: "not a url".to_string(),
            ..filled_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(errors.get("website"), Some("Invalid URL"));
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let form = PropertyForm {
            name: "  Seaside Inn  ".to_string(),
            ..filled_form()
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Seaside Inn");
    }
}

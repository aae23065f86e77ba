//! Centered empty-state hints shown when a view has nothing to list
//!
//! Built with a small builder so each view can describe its own blank
//! screen: a title, a few muted lines of context, and the keys that get
//! the user unstuck.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct EmptyState {
    title: String,
    messages: Vec<String>,
    actions: Vec<(String, String)>,
}

impl EmptyState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            messages: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn action(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.actions.push((key.into(), description.into()));
        self
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.title.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for message in &self.messages {
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }

        if !self.actions.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Actions:",
                Style::default().fg(Color::Cyan),
            )));
            for (key, description) in &self.actions {
                lines.push(Line::from(vec![
                    Span::styled(format!("[{key}] "), Style::default().fg(Color::Green)),
                    Span::styled(description.clone(), Style::default().fg(Color::White)),
                ]));
            }
        }

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }
}

pub fn no_properties() -> EmptyState {
    EmptyState::new("No properties found")
        .message("Your account has no properties yet.")
        .message("Add one to start managing rooms and reservations.")
        .action("1", "Open the Add Property page")
        .action("r", "Refresh properties")
}

pub fn no_property_selected() -> EmptyState {
    EmptyState::new("No property selected")
        .message("This page needs an active property.")
        .action("p", "Select the next property")
        .action("r", "Refresh properties")
}

pub fn no_rooms() -> EmptyState {
    EmptyState::new("No rooms yet")
        .message("The selected property has no rooms.")
        .action("a", "Add a room")
        .action("r", "Refresh")
}

pub fn no_room_types() -> EmptyState {
    EmptyState::new("No room types yet")
        .message("Room types define the rates and capacity")
        .message("that rooms and reservations reference.")
        .action("a", "Add a room type")
        .action("r", "Refresh")
}

pub fn no_reservations(filtered: bool) -> EmptyState {
    if filtered {
        EmptyState::new("No reservations match")
            .message("The current filters exclude every reservation.")
            .action("c", "Clear filters")
            .action("f", "Edit filters")
    } else {
        EmptyState::new("No reservations yet")
            .message("The selected property has no reservations.")
            .action("a", "Add a reservation")
            .action("r", "Refresh")
    }
}

pub fn no_tasks() -> EmptyState {
    EmptyState::new("No tasks")
        .message("Jot down follow-ups without leaving the console.")
        .message("Tasks live only in this session.")
        .action("a", "Add a task")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_messages_and_actions() {
        let state = EmptyState::new("Nothing here")
            .message("first")
            .message("second")
            .action("a", "add");
        assert_eq!(state.title, "Nothing here");
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.actions.len(), 1);
        assert_eq!(state.actions[0].0, "a");
    }

    #[test]
    fn test_filtered_reservations_points_at_clearing() {
        let state = no_reservations(true);
        assert!(state.actions.iter().any(|(key, _)| key == "c"));
        let state = no_reservations(false);
        assert!(state.actions.iter().any(|(key, _)| key == "a"));
    }
}

//! Sign-in screen
//!
//! # Features
//! - Email and password fields, password masked
//! - Submits on a background task so the UI keeps drawing
//! - Inline error line for rejected credentials or network failures
//!
//! # Keybindings
//! - `Tab`/`Down`: next field
//! - `Shift+Tab`/`Up`: previous field
//! - `Enter`: sign in
//! - `Esc`: dismiss the error
//! - `Ctrl+C`: quit (handled by the shell)

use std::sync::Arc;

use crossterm::event::KeyCode;
use innboard_core::SessionStore;
use parking_lot::Mutex;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use crate::components::{edit_string, FormField, Spinner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Email,
    Password,
}

/// Result of the background login task
pub enum LoginOutcome {
    Success,
    Failed(String),
}

pub struct LoginView {
    email: String,
    password: String,
    focus: LoginField,
    submitting: bool,
    error: Option<String>,
    outcome: Arc<Mutex<Option<LoginOutcome>>>,
    spinner: Spinner,
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            submitting: false,
            error: None,
            outcome: Arc::new(Mutex::new(None)),
            spinner: Spinner::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Picks up the result of a finished login task
    pub fn poll(&mut self) {
        let outcome = self.outcome.lock().take();
        if let Some(outcome) = outcome {
            self.submitting = false;
            match outcome {
                LoginOutcome::Success => {
                    self.password.clear();
                    self.error = None;
                }
                LoginOutcome::Failed(message) => {
                    self.password.clear();
                    self.focus = LoginField::Password;
                    self.error = Some(message);
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, session: &Arc<SessionStore>) {
        if self.submitting {
            return;
        }
        match code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = match self.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = match self.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Enter => self.submit(session),
            KeyCode::Esc => self.error = None,
            code => {
                let buffer = match self.focus {
                    LoginField::Email => &mut self.email,
                    LoginField::Password => &mut self.password,
                };
                if edit_string(buffer, code) {
                    self.error = None;
                }
            }
        }
    }

    fn submit(&mut self, session: &Arc<SessionStore>) {
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Email and password are required".to_string());
            return;
        }
        self.submitting = true;
        self.error = None;
        debug!("submitting login");

        let outcome = self.outcome.clone();
        let session = session.clone();
        let email = self.email.trim().to_string();
        let password = self.password.clone();
        tokio::spawn(async move {
            let result = session.login(&email, &password).await;
            *outcome.lock() = Some(match result {
                Ok(_) => LoginOutcome::Success,
                Err(err) => LoginOutcome::Failed(err.to_string()),
            });
        });
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.spinner.tick();

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Length(12),
                Constraint::Percentage(30),
            ])
            .split(area);
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(vertical[1]);
        let box_area = horizontal[1];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" ◈ innboard ");

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Sign in to your account",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(
            FormField::new("Email", &self.email)
                .focused(self.focus == LoginField::Email && !self.submitting)
                .placeholder("you@example.com")
                .lines(),
        );
        lines.extend(
            FormField::new("Password", &self.password)
                .focused(self.focus == LoginField::Password && !self.submitting)
                .masked()
                .lines(),
        );
        lines.push(Line::from(""));

        if self.submitting {
            lines.push(Line::from(vec![
                self.spinner.render(),
                Span::styled(" Signing in…", Style::default().fg(Color::DarkGray)),
            ]));
        } else if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("✗ {error}"),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter sign in │ Tab next field │ Ctrl+C quit",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, box_area);
    }
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use innboard_core::{ApiClient, ApiConfig, EventBus};

    fn session() -> (Arc<SessionStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(
            ApiClient::new(ApiConfig::with_base_url("http://127.0.0.1:9/api")).unwrap(),
        );
        let session = Arc::new(SessionStore::with_config_dir(
            client,
            EventBus::default(),
            dir.path(),
        ));
        (session, dir)
    }

    #[test]
    fn test_tab_cycles_focus() {
        let (session, _dir) = session();
        let mut view = LoginView::new();
        assert_eq!(view.focus, LoginField::Email);
        view.handle_key(KeyCode::Tab, &session);
        assert_eq!(view.focus, LoginField::Password);
        view.handle_key(KeyCode::Tab, &session);
        assert_eq!(view.focus, LoginField::Email);
    }

    #[test]
    fn test_typing_targets_focused_field() {
        let (session, _dir) = session();
        let mut view = LoginView::new();
        view.handle_key(KeyCode::Char('a'), &session);
        view.handle_key(KeyCode::Tab, &session);
        view.handle_key(KeyCode::Char('x'), &session);
        assert_eq!(view.email, "a");
        assert_eq!(view.password, "x");
    }

    #[test]
    fn test_blank_submit_fails_locally() {
        let (session, _dir) = session();
        let mut view = LoginView::new();
        view.handle_key(KeyCode::Enter, &session);
        assert!(!view.submitting);
        assert_eq!(
            view.error.as_deref(),
            Some("Email and password are required")
        );
    }

    #[test]
    fn test_typing_clears_the_error() {
        let (session, _dir) = session();
        let mut view = LoginView::new();
        view.handle_key(KeyCode::Enter, &session);
        assert!(view.error.is_some());
        view.handle_key(KeyCode::Char('a'), &session);
        assert!(view.error.is_none());
    }

    #[test]
    fn test_poll_applies_failed_outcome() {
        let mut view = LoginView::new();
        view.submitting = true;
        view.password = "hunter2".to_string();
        *view.outcome.lock() = Some(LoginOutcome::Failed("Invalid credentials".to_string()));
        view.poll();
        assert!(!view.submitting);
        assert_eq!(view.error.as_deref(), Some("Invalid credentials"));
        assert!(view.password.is_empty());
        assert_eq!(view.focus, LoginField::Password);
    }

    #[test]
    fn test_poll_after_success_clears_password() {
        let mut view = LoginView::new();
        view.submitting = true;
        view.password = "hunter2".to_string();
        *view.outcome.lock() = Some(LoginOutcome::Success);
        view.poll();
        assert!(!view.submitting);
        assert!(view.password.is_empty());
        assert!(view.error.is_none());
    }
}

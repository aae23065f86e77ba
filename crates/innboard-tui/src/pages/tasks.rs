//! Tasks view: a session-local scratch list
//!
//! # Features
//! - Add, edit, and delete free-form tasks without touching the API
//! - Inline editor with a required title
//!
//! # Keybindings
//! - `↑`/`k`, `↓`/`j`: move the selection
//! - `a`: add a task, `e`/`Enter`: edit, `d`: delete
//!
//! Inside the editor: `Tab`/`↓` switch field, `Enter` save, `Esc`
//! cancel.

use crossterm::event::KeyCode;
use innboard_core::models::Task;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::components::{edit_string, FormField, Spinner};
use crate::empty_state;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorField {
    Title,
    Description,
}

struct TaskEditor {
    /// `None` while adding a new task
    id: Option<i64>,
    title: String,
    description: String,
    focus: EditorField,
    error: Option<String>,
}

impl TaskEditor {
    fn blank() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            focus: EditorField::Title,
            error: None,
        }
    }

    fn for_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            focus: EditorField::Title,
            error: None,
        }
    }
}

pub struct TasksView {
    list: ListState,
    editor: Option<TaskEditor>,
    spinner: Spinner,
}

impl TasksView {
    pub fn new() -> Self {
        Self {
            list: ListState::default(),
            editor: None,
            spinner: Spinner::new(),
        }
    }

    pub fn input_active(&self) -> bool {
        self.editor.is_some()
    }

    pub fn handle_key(&mut self, code: KeyCode, app: &App) {
        if self.editor.is_some() {
            self.handle_editor_key(code, app);
            return;
        }

        let tasks = app.tasks.tasks();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(tasks.len()),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(tasks.len()),
            KeyCode::Char('a') => self.editor = Some(TaskEditor::blank()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected(&tasks) {
                    if let Some(task) = app.tasks.begin_edit(task.id) {
                        self.editor = Some(TaskEditor::for_task(&task));
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected(&tasks) {
                    app.tasks.remove(task.id);
                }
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, code: KeyCode, app: &App) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                if editor.id.is_some() {
                    app.tasks.cancel_edit();
                }
                self.editor = None;
            }
            KeyCode::Enter => {
                let saved = match editor.id {
                    Some(id) => app.tasks.update(id, &editor.title, &editor.description),
                    None => app.tasks.add(&editor.title, &editor.description),
                };
                if saved {
                    self.editor = None;
                } else {
                    editor.error = Some("Title is required".to_string());
                }
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
                editor.focus = match editor.focus {
                    EditorField::Title => EditorField::Description,
                    EditorField::Description => EditorField::Title,
                };
            }
            code => {
                let buffer = match editor.focus {
                    EditorField::Title => &mut editor.title,
                    EditorField::Description => &mut editor.description,
                };
                if edit_string(buffer, code) {
                    editor.error = None;
                }
            }
        }
    }

    fn selected(&self, tasks: &[Task]) -> Option<Task> {
        self.list.selected().and_then(|i| tasks.get(i)).cloned()
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.list.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list.select(Some(next));
    }

    fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let previous = match self.list.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list.select(Some(previous));
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, app: &App) {
        self.spinner.tick();

        let tasks = app.tasks.tasks();
        if tasks.is_empty() {
            empty_state::no_tasks().render(f, area);
        } else {
            let len = tasks.len();
            match self.list.selected() {
                None => self.list.select(Some(0)),
                Some(i) if i >= len => self.list.select(Some(len - 1)),
                _ => {}
            }

            let items: Vec<ListItem> = tasks
                .iter()
                .map(|task| {
                    let mut spans = vec![Span::styled(
                        task.title.clone(),
                        Style::default().fg(Color::White),
                    )];
                    if !task.description.is_empty() {
                        spans.push(Span::styled(
                            format!("  {}", task.description),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" Tasks ({len}) ")),
                )
                .highlight_style(Style::default().bg(Color::DarkGray));
            f.render_stateful_widget(list, area, &mut self.list);
        }

        if let Some(editor) = &self.editor {
            self.render_editor(f, editor);
        }
    }

    fn render_editor(&self, f: &mut Frame, editor: &TaskEditor) {
        let area = f.area();
        let width = (area.width / 2).clamp(36, area.width);

        let mut lines: Vec<Line> = vec![Line::from("")];
        lines.extend(
            FormField::new("Title", &editor.title)
                .focused(editor.focus == EditorField::Title)
                .error(editor.error.as_deref())
                .lines(),
        );
        lines.extend(
            FormField::new("Description", &editor.description)
                .focused(editor.focus == EditorField::Description)
                .placeholder("optional")
                .lines(),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Enter save │ Esc cancel │ Tab switch field",
            Style::default().fg(Color::DarkGray),
        )));

        let height = (lines.len() as u16 + 2).min(area.height);
        let rect = Rect::new(
            area.width.saturating_sub(width) / 2,
            area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        let title = if editor.id.is_some() {
            " Edit task "
        } else {
            " Add task "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::focused_border())
            .title(title);

        f.render_widget(Clear, rect);
        f.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

impl Default for TasksView {
    fn default() -> Self {
        Self::new()
    }
}

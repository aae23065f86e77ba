//! Task list controller
//!
//! Tasks are local to the running app: no server round-trips and no
//! persistence, just a scratch list for the person on shift.

use crate::event::{DataEvent, EventBus};
use crate::models::Task;
use parking_lot::RwLock;

#[derive(Default)]
struct TasksState {
    tasks: Vec<Task>,
    /// Id of the task loaded into the edit inputs
    editing: Option<i64>,
}

/// Controller behind the tasks page
pub struct TasksPage {
    bus: EventBus,
    state: RwLock<TasksState>,
}

impl TasksPage {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            state: RwLock::new(TasksState::default()),
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().tasks.is_empty()
    }

    pub fn editing(&self) -> Option<i64> {
        self.state.read().editing
    }

    /// Append a task. A blank title is ignored; the description may be
    /// empty.
    pub fn add(&self, title: &str, description: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        {
            let mut state = self.state.write();
            let id = next_id(&state.tasks);
            state.tasks.push(Task {
                id,
                title: title.to_string(),
                description: description.trim().to_string(),
            });
        }
        self.bus.publish(DataEvent::TasksUpdated);
        true
    }

    /// Load a task into edit mode, returning a copy for the inputs
    pub fn begin_edit(&self, id: i64) -> Option<Task> {
        let mut state = self.state.write();
        let task = state.tasks.iter().find(|t| t.id == id).cloned()?;
        state.editing = Some(id);
        Some(task)
    }

    pub fn cancel_edit(&self) {
        self.state.write().editing = None;
    }

    /// Replace the task under edit. A blank title keeps the old state.
    pub fn update(&self, id: i64, title: &str, description: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let updated = {
            let mut state = self.state.write();
            let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            task.title = title.to_string();
            task.description = description.trim().to_string();
            state.editing = None;
            true
        };
        if updated {
            self.bus.publish(DataEvent::TasksUpdated);
        }
        updated
    }

    pub fn remove(&self, id: i64) -> bool {
        let removed = {
            let mut state = self.state.write();
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != id);
            if state.editing == Some(id) {
                state.editing = None;
            }
            state.tasks.len() != before
        };
        if removed {
            self.bus.publish(DataEvent::TasksUpdated);
        }
        removed
    }
}

/// Millisecond timestamp, bumped past any collision from adds landing in
/// the same millisecond
fn next_id(tasks: &[Task]) -> i64 {
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while tasks.iter().any(|t| t.id == candidate) {
        candidate += 1;
    }
    candidate
}

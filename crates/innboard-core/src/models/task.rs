//! Ad-hoc task entry, local to the running app

/// A scratchpad task; never sent to the server, lost on exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Millisecond timestamp at creation, unique within the list
    pub id: i64,
    pub title: String,
    pub description: String,
}

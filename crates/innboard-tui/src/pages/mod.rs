//! Per-tab views
//!
//! Each view owns cursor and focus state and translates key presses
//! into calls on the matching innboard-core controller. The
//! controllers hold the data and talk to the API; views never issue
//! requests themselves.

pub mod add_property;
pub mod inventory;
pub mod login;
pub mod room_types;
pub mod rooms;
pub mod tasks;

pub use add_property::AddPropertyView;
pub use inventory::InventoryView;
pub use login::LoginView;
pub use room_types::RoomTypesView;
pub use rooms::RoomsView;
pub use tasks::TasksView;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Red banner above a page's content, dismissed with `x`
pub(crate) fn render_error_banner(f: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(vec![
        Span::styled("✗ ", Style::default().fg(Color::Red)),
        Span::raw(message.to_string()),
        Span::styled("  (x dismiss)", Style::default().fg(Color::DarkGray)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Steps through `all` from `current` by `step`, wrapping at the ends
pub(crate) fn cycled<T: PartialEq + Copy>(all: &[T], current: &T, step: i64) -> T {
    if all.is_empty() {
        return *current;
    }
    let len = all.len() as i64;
    let index = all.iter().position(|item| item == current).unwrap_or(0) as i64;
    all[(index + step).rem_euclid(len) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycled_wraps_both_directions() {
        let all = [1, 2, 3];
        assert_eq!(cycled(&all, &1, 1), 2);
        assert_eq!(cycled(&all, &3, 1), 1);
        assert_eq!(cycled(&all, &1, -1), 3);
    }

    #[test]
    fn test_cycled_recovers_from_unknown_value() {
        let all = [1, 2, 3];
        assert_eq!(cycled(&all, &9, 1), 2);
    }
}

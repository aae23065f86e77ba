//! Shared colors and status styling for the TUI

use innboard_core::models::{PaymentStatus, ReservationStatus, RoomStatus};
use ratatui::style::{Color, Style};

/// Base palette used by every view
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fg: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Border style for the widget that owns keyboard focus
pub fn focused_border() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn unfocused_border() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Color for a room status cell
pub fn room_status_color(status: RoomStatus) -> Color {
    match status {
        RoomStatus::Available => Color::Green,
        RoomStatus::Occupied => Color::Cyan,
        RoomStatus::Maintenance => Color::Red,
        RoomStatus::Cleaning => Color::Yellow,
    }
}

/// Color for a reservation status cell
pub fn reservation_status_color(status: ReservationStatus) -> Color {
    match status {
        ReservationStatus::Confirmed => Color::Green,
        ReservationStatus::CheckedIn => Color::Cyan,
        ReservationStatus::CheckedOut => Color::DarkGray,
        ReservationStatus::Cancelled => Color::Red,
        ReservationStatus::NoShow => Color::Yellow,
    }
}

/// Color for a payment status cell
pub fn payment_status_color(status: PaymentStatus) -> Color {
    match status {
        PaymentStatus::Paid => Color::Green,
        PaymentStatus::Pending => Color::Yellow,
        PaymentStatus::PartiallyPaid => Color::Magenta,
        PaymentStatus::Refunded => Color::DarkGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_status_colors() {
        assert_eq!(room_status_color(RoomStatus::Available), Color::Green);
        assert_eq!(room_status_color(RoomStatus::Occupied), Color::Cyan);
        assert_eq!(room_status_color(RoomStatus::Maintenance), Color::Red);
        assert_eq!(room_status_color(RoomStatus::Cleaning), Color::Yellow);
    }

    #[test]
    fn test_reservation_status_colors() {
        assert_eq!(
            reservation_status_color(ReservationStatus::Confirmed),
            Color::Green
        );
        assert_eq!(
            reservation_status_color(ReservationStatus::Cancelled),
            Color::Red
        );
        assert_eq!(
            reservation_status_color(ReservationStatus::NoShow),
            Color::Yellow
        );
    }

    #[test]
    fn test_payment_status_colors() {
        assert_eq!(payment_status_color(PaymentStatus::Paid), Color::Green);
        assert_eq!(payment_status_color(PaymentStatus::Pending), Color::Yellow);
        assert_eq!(
            payment_status_color(PaymentStatus::Refunded),
            Color::DarkGray
        );
    }
}

//! Animated loading spinner

use std::time::{Duration, Instant};

use ratatui::style::{Color, Style};
use ratatui::text::Span;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK: Duration = Duration::from_millis(80);

pub struct Spinner {
    frame: usize,
    last_tick: Instant,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            frame: 0,
            last_tick: Instant::now(),
        }
    }

    /// Advances the animation if enough time has passed
    pub fn tick(&mut self) {
        if self.last_tick.elapsed() >= TICK {
            self.frame = (self.frame + 1) % FRAMES.len();
            self.last_tick = Instant::now();
        }
    }

    pub fn current_frame(&self) -> &'static str {
        FRAMES[self.frame]
    }

    pub fn render(&self) -> Span<'static> {
        Span::styled(FRAMES[self.frame], Style::default().fg(Color::Cyan))
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_after_interval() {
        let mut spinner = Spinner::new();
        assert_eq!(spinner.current_frame(), FRAMES[0]);
        spinner.last_tick = Instant::now() - Duration::from_millis(100);
        spinner.tick();
        assert_eq!(spinner.current_frame(), FRAMES[1]);
    }

    #[test]
    fn test_tick_wraps_around() {
        let mut spinner = Spinner::new();
        spinner.frame = FRAMES.len() - 1;
        spinner.last_tick = Instant::now() - Duration::from_millis(100);
        spinner.tick();
        assert_eq!(spinner.current_frame(), FRAMES[0]);
    }

    #[test]
    fn test_tick_ignores_early_calls() {
        let mut spinner = Spinner::new();
        spinner.tick();
        assert_eq!(spinner.current_frame(), FRAMES[0]);
    }
}

//! innboard-tui - Terminal admin console for innboard
//!
//! Ratatui front end over `innboard-core`: a tabbed shell with the
//! property pages, driven by a 100ms poll loop. Data loads run on
//! background tasks and land through the core event bus, so the UI
//! never blocks on the network.

pub mod app;
pub mod components;
pub mod empty_state;
pub mod pages;
pub mod theme;
pub mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use innboard_core::{ApiClient, EventBus, SessionPhase, SessionStore};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tokio::sync::oneshot;
use tracing::{debug, info};

pub use app::{App, Page};
pub use ui::Ui;

/// Runs the TUI until the user quits. Restores the terminal on exit.
pub async fn run(
    client: Arc<ApiClient>,
    session: Arc<SessionStore>,
    bus: EventBus,
) -> Result<()> {
    info!("starting innboard console");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(client, session, bus);

    // Restore the stored session off the draw loop; the loading screen
    // shows until this finishes.
    let (load_tx, load_rx) = oneshot::channel();
    {
        let session = app.session.clone();
        let properties = app.properties.clone();
        let rooms = app.rooms.clone();
        tokio::spawn(async move {
            let phase = session.bootstrap().await;
            if phase == SessionPhase::SignedIn {
                properties.refresh().await;
                rooms.refresh().await;
            }
            let _ = load_tx.send(());
        });
    }

    let result = run_loop(&mut terminal, app, Ui::new(), load_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut ui: Ui,
    mut load_rx: oneshot::Receiver<()>,
) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    loop {
        if app.bootstrapping && load_rx.try_recv().is_ok() {
            app.complete_bootstrap();
        }

        app.poll_events();
        terminal.draw(|f| ui.render(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        app.should_quit = true;
                    } else if app.bootstrapping {
                        if key.code == KeyCode::Char('q') {
                            app.should_quit = true;
                        }
                    } else if !app.session.is_authenticated() {
                        // Letters must reach the email field, so only
                        // Ctrl+C quits from the login screen
                        ui.handle_login_key(key.code, &app);
                    } else if ui.text_input_active(&app) {
                        // A form owns the keyboard: no global shortcuts
                        ui.handle_page_key(key.code, &app);
                    } else if !app.handle_key(key.code) {
                        ui.handle_page_key(key.code, &app);
                    }
                }
            }
        }

        if app.should_quit {
            debug!("quit requested");
            break;
        }
    }
    Ok(())
}

//! Terminal User Interface for the manifesto advisor
//!
//! A single screen: type a concern, press Enter, read the model's advice.
//! Requests run off the UI thread; a second Enter (or Esc) cancels.

pub mod app;
pub mod msg; // TEA message types (what happened)
pub mod ui;
pub mod update; // TEA update function (state transitions)

use std::io;
use std::time::Duration;

use crossterm::{
    event::{poll, read, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

pub use app::App;
use msg::{key_to_msg, Msg};

/// Run the TUI application
pub fn run(app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app, ensuring cleanup happens even on error
    let result = run_event_loop(&mut terminal, app);

    // Restore terminal - this MUST run even if app fails
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if poll(tick_rate)? {
            match read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let msg = key_to_msg(key.code, key.modifiers, app.model.is_submitting());
                    if app.dispatch(msg) {
                        return Ok(()); // Quit signal
                    }
                }
                Event::Paste(text) => {
                    for c in text.chars().filter(|c| !c.is_control()) {
                        app.dispatch(Msg::Input(c));
                    }
                }
                _ => {}
            }
        }

        // Finished requests (non-blocking)
        app.poll_responses();
        app.dispatch(Msg::Tick);
    }
}

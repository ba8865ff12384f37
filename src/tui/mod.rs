//! Full-screen terminal session.

mod keys;
mod view;

pub use keys::map_key;
pub use view::render;

use anyhow::{Context, Result};
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::app::{App, Tools};
use crate::config::Config;
use crate::drives::{DriveScanner, SystemDriveScanner};
use crate::wake::{self, UiEvent, Waker};

/// Upper bound on how long the loop waits before re-polling batches.
const TICK: Duration = Duration::from_millis(250);
const WAKE_CAPACITY: usize = 64;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive session until the user quits.
pub fn run(config: &Config, runtime: &Handle) -> Result<()> {
    let (tools, notices) = Tools::resolve(&config.tools);
    let scanner = SystemDriveScanner::new(config.drives.candidates.clone(), tools.makemkv.clone());
    let (waker, rx) = wake::channel(WAKE_CAPACITY);
    let mut app = App::new(config, scanner, tools, runtime.clone(), waker.clone());

    let mut terminal = setup_terminal().context("Failed to initialise terminal")?;
    install_panic_hook();
    spawn_input_thread(waker);

    info!("Session started");
    let log_lines = config.ui.log_lines;
    terminal.draw(|f| render(f, &app.view(), log_lines))?;
    app.start(notices);

    let result = event_loop(&mut terminal, &mut app, &rx, log_lines);

    restore_terminal(&mut terminal)?;
    info!("Session ended");
    result
}

fn event_loop<S: DriveScanner>(
    terminal: &mut Term,
    app: &mut App<S>,
    rx: &Receiver<UiEvent>,
    log_lines: usize,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, &app.view(), log_lines))?;

        match rx.recv_timeout(TICK) {
            Ok(UiEvent::Key(key)) => {
                if let Some(event) = map_key(key) {
                    app.dispatch(event);
                }
            }
            Ok(UiEvent::Redraw) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        app.poll_tasks();
        if app.should_quit() {
            break;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}

/// Forward terminal input to the loop. Exits when the loop is gone.
fn spawn_input_thread(waker: Waker) {
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                if !waker.send_input(UiEvent::Key(key)) {
                    break;
                }
            }
            Ok(TermEvent::Resize(..)) => waker.wake(),
            Ok(_) => {}
            Err(e) => {
                warn!("Terminal input failed: {}", e);
                break;
            }
        }
    });
}

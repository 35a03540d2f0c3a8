//! tabia-tui — terminal harness for the navigation/presence core.
//!
//! Simulates the external collaborators with keyboard toggles and
//! renders the header the resolver decides on, so the affordance and
//! popup rules can be exercised interactively.

mod app;
mod config;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing_subscriber::EnvFilter;

use crate::app::{App, START_FEN};
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "tabia-tui", about = "Header affordance / popup harness")]
struct Args {
    /// Session user id (overrides config).
    #[arg(long)]
    user_id: Option<String>,

    /// Board theme name passed to the header renderer.
    #[arg(long)]
    theme: Option<String>,

    /// Make the simulated profile fetch fail (soft-failure demo).
    #[arg(long)]
    fail_fetch: bool,

    /// Write tracing output to this file (a TUI can't log to stdout).
    #[arg(long)]
    log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let mut config = Config::load();
    if args.user_id.is_some() {
        config.user_id = args.user_id.clone();
    }
    if args.theme.is_some() {
        config.theme = args.theme.clone();
    }
    config.save();

    let mut app = App::new(config, args.fail_fetch);
    // Seed a believable world: two friends online, one game running.
    app.set_friends(2);
    app.add_game();
    app.refresh();

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app).await;
    ratatui::restore();
    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    let mut presence_rx = app.hub.subscribe();
    let mut bg_rx = app.bg_rx.take().expect("bg receiver taken once");

    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Presence changes: re-snapshot and re-resolve.
        while presence_rx.try_recv().is_ok() {
            app.refresh();
        }
        // Background fetch completions.
        while let Ok(result) = bg_rx.try_recv() {
            app.on_bg_result(result);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code);
                }
            }
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode) {
    // The paste-FEN popup captures text input while open.
    if app.paste_fen.is_open() {
        match code {
            KeyCode::Esc => app.paste_fen.close(),
            KeyCode::Backspace => app.paste_fen.pop_char(),
            KeyCode::Enter => {
                if let Some(fen) = app.paste_fen.submit() {
                    app.log_line(format!("load position: {fen}"));
                }
            }
            KeyCode::Char(c) => app.paste_fen.push_char(c),
            _ => {}
        }
        return;
    }

    if app.continue_popup.is_open() {
        match code {
            KeyCode::Enter => {
                let fen = app.continue_popup.fen().map(str::to_string);
                if let Some(fen) = fen {
                    app.log_line(format!("→ game from {fen}"));
                }
                app.continue_popup.close();
            }
            KeyCode::Esc => app.continue_popup.close(),
            _ => {}
        }
        return;
    }

    if app.any_popup_open() && code == KeyCode::Esc {
        app.close_popups();
        return;
    }

    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('n') => app.toggle_network(),
        KeyCode::Char('s') => app.toggle_session(),
        KeyCode::Char('g') => app.add_game(),
        KeyCode::Char('x') => app.clear_games(),
        KeyCode::Char('c') => app.add_challenge(true),
        KeyCode::Char('C') => app.add_challenge(false),
        KeyCode::Char('X') => app.clear_challenges(),
        KeyCode::Char('+') => {
            let n = app.friends_count() + 1;
            app.set_friends(n);
        }
        KeyCode::Char('-') => {
            let n = app.friends_count().saturating_sub(1);
            app.set_friends(n);
        }
        KeyCode::Char('o') => app.toggle_offline_cache(),
        KeyCode::Char('1') => app.activate(0),
        KeyCode::Char('2') => app.activate(1),
        KeyCode::Char('!') => app.long_press(0),
        KeyCode::Char('@') => app.long_press(1),
        KeyCode::Char('u') => app.open_mini_user(),
        KeyCode::Char('v') => {
            if !app.continue_popup.open(START_FEN) {
                tracing::debug!("continue popup rejected");
            }
        }
        KeyCode::Char('p') => {
            if !app.paste_fen.open() {
                tracing::debug!("paste-FEN popup rejected");
            }
        }
        _ => {}
    }
}
